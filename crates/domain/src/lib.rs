//! Ferrous Resolver Domain Layer
pub mod config;
pub mod errors;
pub mod expiring;
pub mod name;
pub mod name_server;
pub mod record_type;

pub use config::{
    CliOverrides, Config, ConfigError, IpPreference, LoggingConfig, ResolverConfig,
    TransportConfig,
};
pub use errors::ResolverError;
pub use expiring::Expiring;
pub use name::{DomainName, Label};
pub use name_server::{NameServer, NameServerSet};
pub use record_type::RecordType;
