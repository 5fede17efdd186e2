use ferrous_resolver_domain::{DomainName, ResolveError};
use std::net::IpAddr;
use std::sync::Arc;

use super::addresses::lookup_addresses;
use crate::context::LookupContext;
use crate::ports::RecordSource;

pub struct HostLookupUseCase {
    source: Arc<dyn RecordSource>,
}

impl HostLookupUseCase {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// All IPv4 and IPv6 addresses of `host`. An address literal is returned
    /// as-is without touching the network.
    pub async fn execute(
        &self,
        ctx: &LookupContext,
        host: &str,
    ) -> Result<Vec<IpAddr>, ResolveError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }
        let name = DomainName::parse(host)?;

        let records = ctx
            .run(host, lookup_addresses(self.source.as_ref(), &name))
            .await?;
        Ok(records.into_iter().map(|r| r.ip).collect())
    }
}
