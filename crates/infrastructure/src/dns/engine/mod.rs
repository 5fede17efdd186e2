//! Pure-wire record source.
//!
//! Walks the configured servers in order, one attempt per server per round,
//! with a backoff sleep between rounds. Every attempt gets a fresh
//! transaction id from the shared registry.

mod chase;

use crate::dns::transport::{exchange, TransportError};
use crate::dns::txid::{self, TxidRegistry};
use crate::dns::transport::udp::CLASSIC_UDP_PAYLOAD;
use crate::dns::wire::{decode, encode_query, Message, Rcode};
use async_trait::async_trait;
use chase::{follow_aliases, Chase};
use ferrous_resolver_application::ports::RecordSource;
use ferrous_resolver_domain::{NameServer, Query, Resolution, ResolveError, ResolverConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct QueryEngine {
    servers: Arc<[NameServer]>,
    config: ResolverConfig,
    txids: Arc<TxidRegistry>,
}

impl QueryEngine {
    pub fn new(servers: Vec<NameServer>, config: ResolverConfig) -> Result<Self, ResolveError> {
        if servers.is_empty() {
            return Err(ResolveError::NoServers);
        }

        info!(
            servers = servers.len(),
            timeout_ms = config.query_timeout_ms,
            attempts = config.attempts,
            max_cname_depth = config.max_cname_depth,
            "Query engine created"
        );

        Ok(Self {
            servers: servers.into(),
            config,
            txids: txid::global(),
        })
    }

    /// Uses a private id registry instead of the process-wide one.
    pub fn with_txid_registry(mut self, txids: Arc<TxidRegistry>) -> Self {
        self.txids = txids;
        self
    }

    pub fn servers(&self) -> &[NameServer] {
        &self.servers
    }

    fn max_udp_payload(&self) -> usize {
        match self.config.edns_payload_size {
            0 => CLASSIC_UDP_PAYLOAD,
            size => size as usize,
        }
    }

    /// Sends `query` until a server gives a usable answer.
    ///
    /// NXDOMAIN is final. Any other failure moves on to the next server. A
    /// server that answered with an error rcode or an unusable message sits
    /// out the remaining rounds; only timeouts and network errors are retried.
    /// Once every round is spent the last failure is returned.
    pub async fn query(&self, query: &Query) -> Result<Message, ResolveError> {
        let mut last_error = ResolveError::NoServers;
        let mut benched = vec![false; self.servers.len()];

        for round in 0..self.config.attempts {
            if benched.iter().all(|&b| b) {
                debug!(round = round, "No server left to retry");
                break;
            }
            if round > 0 {
                let delay = self.config.backoff_delay(round);
                debug!(round = round, delay_ms = delay.as_millis() as u64, "Backing off");
                tokio::time::sleep(delay).await;
            }

            for (index, server) in self.servers.iter().enumerate() {
                if benched[index] {
                    continue;
                }
                match self.attempt(server, query).await {
                    Ok(message) => {
                        debug!(
                            server = %server,
                            position = index,
                            answers = message.answers.len(),
                            "Server responded"
                        );
                        return Ok(message);
                    }
                    Err(Failure {
                        error: e @ (ResolveError::NotFound { .. } | ResolveError::InvalidName(_)),
                        ..
                    }) => {
                        return Err(e);
                    }
                    Err(Failure { error, retry }) => {
                        warn!(
                            server = %server,
                            error = %error,
                            position = index,
                            round = round,
                            retry = retry,
                            "Failing over"
                        );
                        benched[index] = !retry;
                        last_error = error;
                    }
                }
            }
        }

        Err(last_error)
    }

    async fn attempt(&self, server: &NameServer, query: &Query) -> Result<Message, Failure> {
        let addr = server.socket_addr();
        let guard = self
            .txids
            .allocate(addr)
            .ok_or_else(|| Failure::retry(server_failure(addr, "no free transaction id")))?;

        let request = encode_query(query, guard.id(), self.config.edns_payload_size)
            .map_err(|e| ResolveError::InvalidName(format!("{}: {}", query.name, e)))?;

        let response = exchange(
            server,
            &request,
            self.config.query_timeout(),
            self.max_udp_payload(),
        )
        .await
        .map_err(|e| match e {
            TransportError::Timeout { .. } => Failure::retry(ResolveError::Timeout {
                name: query.name.to_fqdn(),
            }),
            TransportError::Network { server, reason } => {
                Failure::retry(server_failure(server, reason))
            }
            TransportError::Truncated { server } => {
                server_failure(server, "truncated answer over TCP").into()
            }
        })?;

        let message = decode(&response.bytes).map_err(|e| ResolveError::MalformedResponse {
            server: addr.to_string(),
            reason: e.to_string(),
        })?;

        check_echo(&message, guard.id(), query, addr)?;
        drop(guard);

        debug!(
            server = %addr,
            protocol = response.protocol_used,
            rcode = %message.rcode(),
            "Response accepted"
        );

        match message.rcode() {
            Rcode::NoError => Ok(message),
            Rcode::NXDomain => Err(ResolveError::not_found(
                query.name.to_fqdn(),
                query.record_type,
                true,
            )
            .into()),
            rcode => Err(server_failure(addr, rcode.to_string()).into()),
        }
    }
}

/// A failed attempt, and whether the same server may be asked again later in
/// this call.
#[derive(Debug)]
struct Failure {
    error: ResolveError,
    retry: bool,
}

impl Failure {
    fn retry(error: ResolveError) -> Self {
        Self { error, retry: true }
    }
}

impl From<ResolveError> for Failure {
    fn from(error: ResolveError) -> Self {
        Self {
            error,
            retry: false,
        }
    }
}

fn server_failure(server: SocketAddr, reason: impl Into<String>) -> ResolveError {
    ResolveError::ServerFailure {
        server: server.to_string(),
        reason: reason.into(),
    }
}

/// The answer must be a response to this id carrying our question back.
fn check_echo(
    message: &Message,
    id: u16,
    query: &Query,
    server: SocketAddr,
) -> Result<(), ResolveError> {
    let malformed = |reason: String| ResolveError::MalformedResponse {
        server: server.to_string(),
        reason,
    };

    if message.id() != id {
        return Err(malformed(format!("id {} does not match query id {}", message.id(), id)));
    }
    if !message.header.response {
        return Err(malformed("QR bit not set".to_string()));
    }
    match message.question() {
        Some(q) if q.name == query.name && q.record_type == query.record_type => Ok(()),
        Some(q) => Err(malformed(format!("question {} does not match {}", q, query))),
        // Servers may drop the question on error rcodes.
        None if message.rcode() != Rcode::NoError => Ok(()),
        None => Err(malformed("question section missing".to_string())),
    }
}

#[async_trait]
impl RecordSource for QueryEngine {
    async fn resolve(&self, query: &Query) -> Result<Resolution, ResolveError> {
        let mut current = query.name.clone();
        let mut hops = 0usize;

        loop {
            let message = self
                .query(&Query::new(current.clone(), query.record_type))
                .await?;

            match follow_aliases(
                &message.answers,
                &current,
                query.record_type,
                &mut hops,
                self.config.max_cname_depth,
            ) {
                Chase::Answer(resolution) => return Ok(resolution),
                Chase::Redirect(target) => {
                    debug!(from = %current, to = %target, hops = hops, "Following CNAME");
                    current = target;
                }
                Chase::NoData(owner) => {
                    return Err(ResolveError::not_found(
                        owner.to_fqdn(),
                        query.record_type,
                        false,
                    ))
                }
                Chase::TooDeep => {
                    return Err(ResolveError::ResolutionLoop {
                        name: query.name.to_fqdn(),
                        depth: self.config.max_cname_depth,
                    })
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "wire"
    }
}
