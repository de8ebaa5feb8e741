//! Layered TOML configuration.
pub mod errors;
pub mod logging;
pub mod resolver;
pub mod root;
pub mod transport;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use resolver::{IpPreference, ResolverConfig};
pub use root::{CliOverrides, Config};
pub use transport::TransportConfig;
