use ferrous_resolver_domain::{AddressRecord, DomainName, Query, RecordType, ResolveError};
use tracing::debug;

use crate::ports::RecordSource;

/// Queries A and AAAA concurrently and merges the answers, IPv4 first.
///
/// A missing family is not an error. Any other failure of either sub-query
/// fails the whole lookup.
pub(super) async fn lookup_addresses(
    source: &dyn RecordSource,
    name: &DomainName,
) -> Result<Vec<AddressRecord>, ResolveError> {
    let v4_query = Query::new(name.clone(), RecordType::A);
    let v6_query = Query::new(name.clone(), RecordType::AAAA);

    let (v4, v6) = tokio::join!(source.resolve(&v4_query), source.resolve(&v6_query));

    let mut nxdomain = true;
    let mut addresses = Vec::new();

    for (family, result) in [(RecordType::A, v4), (RecordType::AAAA, v6)] {
        match result {
            Ok(resolution) => {
                let want_v4 = family == RecordType::A;
                addresses.extend(resolution.records.iter().filter_map(|record| {
                    record
                        .data
                        .ip_addr()
                        .filter(|ip| ip.is_ipv4() == want_v4)
                        .map(|ip| AddressRecord::new(ip, record.ttl))
                }));
                nxdomain = false;
            }
            Err(e) if e.is_not_found() => {
                debug!(name = %name, record_type = %family, "No addresses for family");
                nxdomain &= e.is_nxdomain();
            }
            Err(e) => return Err(e),
        }
    }

    if addresses.is_empty() {
        return Err(ResolveError::not_found(
            name.to_fqdn(),
            RecordType::A,
            nxdomain,
        ));
    }
    Ok(addresses)
}
