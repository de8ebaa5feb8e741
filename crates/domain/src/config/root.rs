use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::{IpPreference, ResolverConfig};
use super::transport::TransportConfig;

/// Main configuration structure for Ferrous Resolver
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Iteration behavior (caches, alias following, IP preference)
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Network exchange configuration
    #[serde(default)]
    pub transport: TransportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub ipv4_only: bool,
    pub ipv6_only: bool,
    pub query_timeout: Option<u64>,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-resolver.toml in current directory
    /// 3. /etc/ferrous-resolver/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("ferrous-resolver.toml").exists() {
            Self::from_file("ferrous-resolver.toml")?
        } else if std::path::Path::new("/etc/ferrous-resolver/config.toml").exists() {
            Self::from_file("/etc/ferrous-resolver/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.ipv4_only {
            self.resolver.ip_preference = IpPreference::V4Only;
        }
        if overrides.ipv6_only {
            self.resolver.ip_preference = IpPreference::V6Only;
        }
        if let Some(timeout) = overrides.query_timeout {
            self.transport.query_timeout = timeout;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transport.query_timeout == 0 {
            return Err(ConfigError::Validation(
                "Query timeout cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}
