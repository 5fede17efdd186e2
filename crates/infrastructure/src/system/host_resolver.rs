use async_trait::async_trait;
use ferrous_resolver_application::ports::RecordSource;
use ferrous_resolver_domain::{Query, RData, Record, RecordType, Resolution, ResolveError};
use std::io;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Delegates address questions to the operating system resolver.
///
/// The system call reports neither TTLs nor aliases, so records carry TTL 0
/// and the canonical name is the queried one. Record types the system call
/// cannot answer go to `fallback` when one is set.
pub struct HostRecordSource {
    fallback: Option<Arc<dyn RecordSource>>,
}

impl HostRecordSource {
    pub fn new() -> Self {
        Self { fallback: None }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn RecordSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    async fn lookup_addresses(&self, query: &Query) -> Result<Resolution, ResolveError> {
        let fqdn = query.name.to_fqdn();
        // getaddrinfo matches hosts-file entries only without the root dot.
        let host = fqdn.trim_end_matches('.');
        let want_v4 = query.record_type == RecordType::A;

        let addrs = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|e| {
                debug!(name = %fqdn, error = %e, "Host lookup failed");
                lookup_error(&fqdn, query.record_type, &e)
            })?;

        let mut records: Vec<Record> = Vec::new();
        for addr in addrs {
            let data = match addr.ip() {
                IpAddr::V4(v4) if want_v4 => RData::A(v4),
                IpAddr::V6(v6) if !want_v4 => RData::AAAA(v6),
                _ => continue,
            };
            let record = Record::new(query.name.clone(), 0, data);
            if !records.contains(&record) {
                records.push(record);
            }
        }

        if records.is_empty() {
            return Err(ResolveError::not_found(fqdn, query.record_type, false));
        }
        Ok(Resolution::new(query.name.clone(), records))
    }
}

/// A system lookup that ran out of time (or hit EAI_AGAIN, which glibc and
/// musl report when every nameserver timed out) is a timeout. Anything else
/// means the name could not be found.
fn lookup_error(fqdn: &str, record_type: RecordType, err: &io::Error) -> ResolveError {
    let temporary = err.kind() == io::ErrorKind::TimedOut
        || err
            .to_string()
            .to_ascii_lowercase()
            .contains("temporary failure in name resolution");
    if temporary {
        ResolveError::Timeout {
            name: fqdn.to_string(),
        }
    } else {
        ResolveError::not_found(fqdn, record_type, true)
    }
}

impl Default for HostRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSource for HostRecordSource {
    async fn resolve(&self, query: &Query) -> Result<Resolution, ResolveError> {
        if query.record_type.is_address() {
            return self.lookup_addresses(query).await;
        }

        match &self.fallback {
            Some(fallback) => {
                debug!(query = %query, fallback = fallback.name(), "Delegating to fallback source");
                fallback.resolve(query).await
            }
            None => Err(ResolveError::Unsupported {
                record_type: query.record_type,
                source_name: self.name(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "host"
    }
}
