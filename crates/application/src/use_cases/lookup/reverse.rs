use ferrous_resolver_domain::{DomainName, Query, RData, RecordType, ResolveError};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

use super::resolve_non_empty;
use crate::context::LookupContext;
use crate::ports::RecordSource;

pub struct ReverseLookupUseCase {
    source: Arc<dyn RecordSource>,
}

impl ReverseLookupUseCase {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Host names pointing back at `addr`, in response order.
    pub async fn execute(
        &self,
        ctx: &LookupContext,
        addr: &str,
    ) -> Result<Vec<DomainName>, ResolveError> {
        let ip = addr.parse::<IpAddr>().map_err(|_| {
            ResolveError::InvalidName(format!("'{}' is not an IP address", addr))
        })?;
        let query = Query::new(reverse_name(&ip)?, RecordType::PTR);

        debug!(ip = %ip, reverse_domain = %query.name, "Performing PTR lookup");

        let resolution = ctx
            .run(addr, resolve_non_empty(self.source.as_ref(), &query))
            .await?;

        Ok(resolution
            .records
            .into_iter()
            .filter_map(|record| match record.data {
                RData::Ptr(name) => Some(name),
                _ => None,
            })
            .collect())
    }
}

/// `in-addr.arpa` / `ip6.arpa` owner name for `ip`.
pub fn reverse_name(ip: &IpAddr) -> Result<DomainName, ResolveError> {
    let labels: Vec<String> = match ip {
        IpAddr::V4(ipv4) => ipv4
            .octets()
            .iter()
            .rev()
            .map(|octet| octet.to_string())
            .chain(["in-addr".to_string(), "arpa".to_string()])
            .collect(),
        IpAddr::V6(ipv6) => ipv6
            .octets()
            .iter()
            .rev()
            .flat_map(|byte| [byte & 0x0f, byte >> 4])
            .map(|nibble| format!("{:x}", nibble))
            .chain(["ip6".to_string(), "arpa".to_string()])
            .collect(),
    };
    DomainName::from_labels(labels)
}
