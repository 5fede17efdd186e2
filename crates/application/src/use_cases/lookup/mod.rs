mod addresses;
mod cname;
mod host;
mod ip_addr;
mod mx;
mod ns;
mod port;
mod reverse;
mod srv;
mod txt;

pub use cname::CnameLookupUseCase;
pub use host::HostLookupUseCase;
pub use ip_addr::IpAddrLookupUseCase;
pub use mx::MxLookupUseCase;
pub use ns::NsLookupUseCase;
pub use port::PortLookupUseCase;
pub use reverse::{reverse_name, ReverseLookupUseCase};
pub use srv::SrvLookupUseCase;
pub use txt::TxtLookupUseCase;

use ferrous_resolver_domain::{Query, Resolution, ResolveError};

use crate::ports::RecordSource;

/// Resolves `query` and fails with `NotFound` when a source hands back an
/// empty answer.
async fn resolve_non_empty(
    source: &dyn RecordSource,
    query: &Query,
) -> Result<Resolution, ResolveError> {
    let resolution = source.resolve(query).await?;
    if resolution.records.is_empty() {
        return Err(ResolveError::not_found(
            query.name.to_fqdn(),
            query.record_type,
            false,
        ));
    }
    Ok(resolution)
}
