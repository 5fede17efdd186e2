use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::errors::ConfigError;
use crate::NameServer;

/// Where answers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolverMode {
    /// Speak DNS directly to the configured servers.
    #[default]
    Wire,
    /// Delegate to the operating system resolver.
    Host,
}

impl FromStr for ResolverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wire" => Ok(ResolverMode::Wire),
            "host" => Ok(ResolverMode::Host),
            other => Err(format!("Unknown resolver mode '{}'", other)),
        }
    }
}

impl fmt::Display for ResolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverMode::Wire => f.write_str("wire"),
            ResolverMode::Host => f.write_str("host"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    Fixed,
    #[default]
    Exponential,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub mode: ResolverMode,

    /// Name servers in preference order (IP, IP:PORT, udp://..., tcp://...)
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Prepend the nameservers listed in /etc/resolv.conf
    #[serde(default)]
    pub use_system_servers: bool,

    /// Per-attempt timeout
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Overall budget for a single lookup call
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,

    /// Rounds over the full server list
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default)]
    pub backoff: BackoffKind,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,

    #[serde(default = "default_max_cname_depth")]
    pub max_cname_depth: usize,

    /// Advertised EDNS0 UDP payload size, 0 disables EDNS
    #[serde(default = "default_edns_payload_size")]
    pub edns_payload_size: u16,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            mode: ResolverMode::default(),
            servers: default_servers(),
            use_system_servers: false,
            query_timeout_ms: default_query_timeout_ms(),
            deadline_ms: default_deadline_ms(),
            attempts: default_attempts(),
            backoff: BackoffKind::default(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            max_cname_depth: default_max_cname_depth(),
            edns_payload_size: default_edns_payload_size(),
        }
    }
}

impl ResolverConfig {
    /// Parses `servers`. Does not read resolv.conf.
    pub fn name_servers(&self) -> Result<Vec<NameServer>, ConfigError> {
        self.servers
            .iter()
            .map(|s| s.parse::<NameServer>().map_err(ConfigError::Validation))
            .collect()
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Delay to wait before retry round `round` (1-based).
    pub fn backoff_delay(&self, round: u32) -> Duration {
        let base = self.backoff_base_ms;
        let ms = match self.backoff {
            BackoffKind::Fixed => base,
            BackoffKind::Exponential => {
                let shift = round.saturating_sub(1).min(16);
                base.saturating_mul(1u64 << shift)
            }
        };
        Duration::from_millis(ms.min(self.backoff_max_ms))
    }
}

fn default_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()]
}

fn default_query_timeout_ms() -> u64 {
    2000
}

fn default_deadline_ms() -> u64 {
    5000
}

fn default_attempts() -> u32 {
    2
}

fn default_backoff_base_ms() -> u64 {
    100
}

fn default_backoff_max_ms() -> u64 {
    1000
}

fn default_max_cname_depth() -> usize {
    10
}

fn default_edns_payload_size() -> u16 {
    1232
}
