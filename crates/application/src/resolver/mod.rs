pub mod classify;
pub mod iter;
pub mod lookup;
pub mod records;
pub mod root_hints;

pub use classify::{classify, QueryOutcome};
pub use iter::{ResolutionIter, ResolutionStep};
pub use lookup::{Resolution, Resolver};
