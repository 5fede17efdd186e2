//! Differential checks against a hickory-proto reference resolver.
//!
//! These need network access to a public recursive server and are ignored
//! by default.

use ferrous_resolver_application::parity::{
    check_consist_of, check_equal, check_ip_addrs, check_mx, check_srv,
};
use ferrous_resolver_application::{LookupContext, Resolver};
use ferrous_resolver_domain::{NameServer, ResolverConfig};
use ferrous_resolver_infrastructure::QueryEngine;
use ferrous_resolver_parity::HickoryOracle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const UPSTREAM: &str = "8.8.8.8:53";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

struct Pair {
    subject: Resolver,
    reference: Resolver,
}

impl Pair {
    fn new() -> Self {
        let upstream: SocketAddr = UPSTREAM.parse().unwrap();
        let engine =
            QueryEngine::new(vec![NameServer::udp(upstream)], ResolverConfig::default()).unwrap();
        let oracle = HickoryOracle::new(upstream, LOOKUP_TIMEOUT);

        Self {
            subject: Resolver::with_options(Arc::new(engine), LOOKUP_TIMEOUT, 10),
            reference: Resolver::with_options(Arc::new(oracle), LOOKUP_TIMEOUT, 10),
        }
    }

    fn ctx(&self) -> LookupContext {
        LookupContext::with_timeout(LOOKUP_TIMEOUT)
    }
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_lookup_addr_parity() {
    let pair = Pair::new();
    let ours = pair.subject.lookup_addr(&pair.ctx(), "8.8.8.8").await.unwrap();
    let reference = pair.reference.lookup_addr(&pair.ctx(), "8.8.8.8").await.unwrap();
    check_consist_of("addr", &ours, &reference).unwrap();
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_lookup_cname_parity() {
    let pair = Pair::new();
    let ours = pair
        .subject
        .lookup_cname(&pair.ctx(), "mail.icecave.com.au")
        .await
        .unwrap();
    let reference = pair
        .reference
        .lookup_cname(&pair.ctx(), "mail.icecave.com.au")
        .await
        .unwrap();
    check_equal("cname", &ours, &reference).unwrap();
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_lookup_host_parity() {
    let pair = Pair::new();
    let ours = pair
        .subject
        .lookup_host(&pair.ctx(), "www.icecave.com.au")
        .await
        .unwrap();
    let reference = pair
        .reference
        .lookup_host(&pair.ctx(), "www.icecave.com.au")
        .await
        .unwrap();
    check_consist_of("host", &ours, &reference).unwrap();
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_lookup_ip_addr_parity() {
    let pair = Pair::new();
    let ours = pair
        .subject
        .lookup_ip_addr(&pair.ctx(), "icecave.com.au")
        .await
        .unwrap();
    let reference = pair
        .reference
        .lookup_ip_addr(&pair.ctx(), "icecave.com.au")
        .await
        .unwrap();
    check_ip_addrs(&ours, &reference).unwrap();
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_lookup_mx_parity() {
    let pair = Pair::new();
    let ours = pair.subject.lookup_mx(&pair.ctx(), "icecave.com.au").await.unwrap();
    let reference = pair
        .reference
        .lookup_mx(&pair.ctx(), "icecave.com.au")
        .await
        .unwrap();
    check_mx(&ours, &reference).unwrap();
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_lookup_ns_parity() {
    let pair = Pair::new();
    let ours = pair.subject.lookup_ns(&pair.ctx(), "icecave.com.au").await.unwrap();
    let reference = pair
        .reference
        .lookup_ns(&pair.ctx(), "icecave.com.au")
        .await
        .unwrap();
    check_consist_of("ns", &ours, &reference).unwrap();
}

#[test]
fn test_lookup_port_matches_iana() {
    let pair = Pair::new();
    let ours = pair.subject.lookup_port("tcp", "https").unwrap();
    check_equal("port", &ours, &443).unwrap();
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_lookup_srv_parity() {
    let pair = Pair::new();
    let ours = pair
        .subject
        .lookup_srv(&pair.ctx(), "jabber", "tcp", "icecave.com.au")
        .await
        .unwrap();
    let reference = pair
        .reference
        .lookup_srv(&pair.ctx(), "jabber", "tcp", "icecave.com.au")
        .await
        .unwrap();
    check_srv(&ours, &reference).unwrap();
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_lookup_txt_parity() {
    let pair = Pair::new();
    let ours = pair.subject.lookup_txt(&pair.ctx(), "icecave.com.au").await.unwrap();
    let reference = pair
        .reference
        .lookup_txt(&pair.ctx(), "icecave.com.au")
        .await
        .unwrap();
    check_consist_of("txt", &ours, &reference).unwrap();
}
