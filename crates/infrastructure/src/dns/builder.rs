use super::engine::QueryEngine;
use super::txid::TxidRegistry;
use crate::system::{HostRecordSource, ResolvConf, ResolvConfReader};
use ferrous_resolver_application::ports::RecordSource;
use ferrous_resolver_application::Resolver;
use ferrous_resolver_domain::{ConfigError, NameServer, ResolveError, ResolverConfig, ResolverMode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const MAX_SYSTEM_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_SYSTEM_ATTEMPTS: u32 = 5;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Turns a `ResolverConfig` into a ready `RecordSource` or `Resolver`.
pub struct SourceBuilder {
    config: ResolverConfig,
    resolv_conf: ResolvConfReader,
    txids: Option<Arc<TxidRegistry>>,
}

impl SourceBuilder {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            resolv_conf: ResolvConfReader::default(),
            txids: None,
        }
    }

    pub fn with_resolv_conf(mut self, reader: ResolvConfReader) -> Self {
        self.resolv_conf = reader;
        self
    }

    pub fn with_txid_registry(mut self, txids: Arc<TxidRegistry>) -> Self {
        self.txids = Some(txids);
        self
    }

    /// Configured servers, with the system's nameservers in front when
    /// `use_system_servers` is set. Duplicates keep their first position.
    pub async fn name_servers(&self) -> Result<Vec<NameServer>, ConfigError> {
        let conf = self.system_conf().await;
        self.merge_servers(conf.as_ref())
    }

    /// Resolver settings with the system's `options timeout:` and
    /// `attempts:` applied when `use_system_servers` is set.
    pub async fn effective_config(&self) -> ResolverConfig {
        let conf = self.system_conf().await;
        self.apply_system_options(conf.as_ref())
    }

    async fn system_conf(&self) -> Option<ResolvConf> {
        if !self.config.use_system_servers {
            return None;
        }
        match self.resolv_conf.read().await {
            Ok(conf) => Some(conf),
            Err(e) => {
                warn!(error = %e, "Could not read system resolver configuration");
                None
            }
        }
    }

    fn merge_servers(&self, conf: Option<&ResolvConf>) -> Result<Vec<NameServer>, ConfigError> {
        let configured = self.config.name_servers()?;
        let Some(conf) = conf else {
            return Ok(configured);
        };

        let mut servers = conf.nameservers.clone();
        for server in configured {
            if !servers.contains(&server) {
                servers.push(server);
            }
        }
        Ok(servers)
    }

    fn apply_system_options(&self, conf: Option<&ResolvConf>) -> ResolverConfig {
        let mut config = self.config.clone();
        let Some(conf) = conf else {
            return config;
        };

        // Zero leaves the configured value; upper bounds follow resolv.conf(5).
        if let Some(timeout) = conf.timeout.filter(|t| !t.is_zero()) {
            config.query_timeout_ms = timeout.min(MAX_SYSTEM_TIMEOUT).as_millis() as u64;
        }
        if let Some(attempts) = conf.attempts.filter(|&n| n > 0) {
            config.attempts = attempts.min(MAX_SYSTEM_ATTEMPTS);
        }
        debug!(
            timeout_ms = config.query_timeout_ms,
            attempts = config.attempts,
            "Applied system resolver options"
        );
        config
    }

    async fn engine(&self) -> Result<QueryEngine, BuildError> {
        let conf = self.system_conf().await;
        let engine = QueryEngine::new(
            self.merge_servers(conf.as_ref())?,
            self.apply_system_options(conf.as_ref()),
        )?;
        Ok(match &self.txids {
            Some(txids) => engine.with_txid_registry(Arc::clone(txids)),
            None => engine,
        })
    }

    pub async fn build(&self) -> Result<Arc<dyn RecordSource>, BuildError> {
        info!(
            mode = %self.config.mode,
            system_servers = self.config.use_system_servers,
            "Building record source"
        );

        match self.config.mode {
            ResolverMode::Wire => Ok(Arc::new(self.engine().await?)),
            ResolverMode::Host => {
                let source = match self.engine().await {
                    Ok(engine) => HostRecordSource::new().with_fallback(Arc::new(engine)),
                    Err(BuildError::Resolve(ResolveError::NoServers)) => {
                        info!("No name servers configured, host source has no wire fallback");
                        HostRecordSource::new()
                    }
                    Err(e) => return Err(e),
                };
                Ok(Arc::new(source))
            }
        }
    }

    pub async fn build_resolver(&self) -> Result<Resolver, BuildError> {
        let source = self.build().await?;
        Ok(Resolver::with_options(
            source,
            self.config.deadline(),
            self.config.max_cname_depth,
        ))
    }
}
