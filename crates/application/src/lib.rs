//! Ferrous Resolver Application Layer
//!
//! The resolution engine: caches, response classification and the step-wise
//! delegation walk, behind a transport port the infrastructure layer fills.
pub mod cache;
pub mod ports;
pub mod resolver;

pub use cache::{AddressCache, AuthorityCache, SuffixCache};
pub use ports::DnsTransport;
pub use resolver::{
    classify, QueryOutcome, Resolution, ResolutionIter, ResolutionStep, Resolver,
};
