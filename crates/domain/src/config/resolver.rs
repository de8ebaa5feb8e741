use crate::record_type::RecordType;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Which IP version the resolver connects over, and therefore which address
/// question a name-server sub-resolution asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IpPreference {
    V4Only,
    V6Only,
    /// Query ANY for sub-resolutions; prefer v6 when both are known.
    #[default]
    DualStack,
}

impl IpPreference {
    pub fn question_type(&self) -> RecordType {
        match self {
            IpPreference::V4Only => RecordType::A,
            IpPreference::V6Only => RecordType::AAAA,
            IpPreference::DualStack => RecordType::ANY,
        }
    }

    pub fn allows(&self, addr: &IpAddr) -> bool {
        match self {
            IpPreference::V4Only => addr.is_ipv4(),
            IpPreference::V6Only => addr.is_ipv6(),
            IpPreference::DualStack => true,
        }
    }

    /// Pick a usable address from a candidate list.
    pub fn pick<'a>(&self, addresses: &'a [IpAddr]) -> Option<&'a IpAddr> {
        match self {
            IpPreference::V4Only => addresses.iter().find(|a| a.is_ipv4()),
            IpPreference::V6Only => addresses.iter().find(|a| a.is_ipv6()),
            IpPreference::DualStack => addresses
                .iter()
                .find(|a| a.is_ipv6())
                .or_else(|| addresses.first()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Seed depth-0 resolutions from the shared referral cache instead of
    /// always starting at the root hints.
    #[serde(default = "default_true")]
    pub use_authority_cache: bool,

    /// When set, additional-section addresses from non-authoritative
    /// responses are not written into the shared address cache.
    #[serde(default = "default_false")]
    pub strict_authoritative: bool,

    #[serde(default)]
    pub ip_preference: IpPreference,

    /// Repeat a truncated exchange over TCP (handled by the transport layer).
    #[serde(default = "default_true")]
    pub retry_tcp_on_truncation: bool,

    #[serde(default = "default_true")]
    pub follow_cname: bool,

    /// Hard cap on delegation steps per resolution; 0 disables the cap.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            use_authority_cache: true,
            strict_authoritative: false,
            ip_preference: IpPreference::default(),
            retry_tcp_on_truncation: true,
            follow_cname: true,
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_max_iterations() -> u32 {
    40
}
