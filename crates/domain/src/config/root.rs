use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::{ResolverConfig, ResolverMode};

const LOCAL_CONFIG_PATH: &str = "ferrous-resolver.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-resolver/config.toml";

/// Main configuration structure for Ferrous Resolver
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Lookup behaviour: servers, timeouts, retries
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
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
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(servers) = overrides.servers {
            if !servers.is_empty() {
                self.resolver.servers = servers;
                // Explicit servers on the command line win over resolv.conf.
                self.resolver.use_system_servers = false;
            }
        }
        if let Some(timeout) = overrides.query_timeout_ms {
            self.resolver.query_timeout_ms = timeout;
        }
        if let Some(mode) = overrides.mode {
            self.resolver.mode = mode;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let resolver = &self.resolver;

        if resolver.mode == ResolverMode::Wire
            && resolver.servers.is_empty()
            && !resolver.use_system_servers
        {
            return Err(ConfigError::Validation(
                "No name servers configured".to_string(),
            ));
        }

        resolver.name_servers()?;

        if resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "query_timeout_ms cannot be 0".to_string(),
            ));
        }
        if resolver.deadline_ms == 0 {
            return Err(ConfigError::Validation(
                "deadline_ms cannot be 0".to_string(),
            ));
        }
        if resolver.attempts == 0 {
            return Err(ConfigError::Validation("attempts cannot be 0".to_string()));
        }
        if resolver.max_cname_depth == 0 {
            return Err(ConfigError::Validation(
                "max_cname_depth cannot be 0".to_string(),
            ));
        }
        if resolver.backoff_max_ms < resolver.backoff_base_ms {
            return Err(ConfigError::Validation(format!(
                "backoff_max_ms ({}) is smaller than backoff_base_ms ({})",
                resolver.backoff_max_ms, resolver.backoff_base_ms
            )));
        }
        if resolver.edns_payload_size != 0 && resolver.edns_payload_size < 512 {
            return Err(ConfigError::Validation(format!(
                "edns_payload_size {} is below the 512 byte minimum",
                resolver.edns_payload_size
            )));
        }

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|path| std::path::Path::new(path).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub servers: Option<Vec<String>>,
    pub query_timeout_ms: Option<u64>,
    pub mode: Option<ResolverMode>,
    pub log_level: Option<String>,
}
