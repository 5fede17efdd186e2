#![allow(dead_code)]
pub mod mock_dns_server;

pub use mock_dns_server::{answer, with_rcode, MockDnsServer, Proto, Reply};

use ferrous_resolver_domain::{DomainName, ResolverConfig};

pub fn name(s: &str) -> DomainName {
    DomainName::parse(s).unwrap()
}

/// One round, short timeout and no real backoff.
pub fn test_config(query_timeout_ms: u64) -> ResolverConfig {
    ResolverConfig {
        query_timeout_ms,
        attempts: 1,
        backoff_base_ms: 10,
        backoff_max_ms: 10,
        ..ResolverConfig::default()
    }
}
