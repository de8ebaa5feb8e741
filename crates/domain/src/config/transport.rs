use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// Per-exchange timeout in milliseconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            query_timeout: default_query_timeout(),
        }
    }
}

fn default_query_timeout() -> u64 {
    2000
}
