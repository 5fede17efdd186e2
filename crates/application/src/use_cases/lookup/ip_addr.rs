use ferrous_resolver_domain::{AddressRecord, DomainName, ResolveError};
use std::net::IpAddr;
use std::sync::Arc;

use super::addresses::lookup_addresses;
use crate::context::LookupContext;
use crate::ports::RecordSource;

pub struct IpAddrLookupUseCase {
    source: Arc<dyn RecordSource>,
}

impl IpAddrLookupUseCase {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Like a host lookup, but keeps the TTL each address was served with.
    /// Literals come back with a TTL of zero.
    pub async fn execute(
        &self,
        ctx: &LookupContext,
        host: &str,
    ) -> Result<Vec<AddressRecord>, ResolveError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![AddressRecord::new(ip, 0)]);
        }
        let name = DomainName::parse(host)?;

        ctx.run(host, lookup_addresses(self.source.as_ref(), &name))
            .await
    }
}
