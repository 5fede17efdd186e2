//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). Datagrams whose id does not match
//! the outstanding query, or that come from another address, are dropped
//! and the transport keeps listening until its timeout.

use super::{DnsTransport, TransportError, TransportResponse};
use crate::dns::wire::{Header, MAX_MESSAGE_LEN};
use async_trait::async_trait;
use bytes::Bytes;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Without EDNS(0) a server may not send more than this (RFC 1035 §2.3.4).
pub const CLASSIC_UDP_PAYLOAD: usize = 512;

pub struct UdpTransport {
    server_addr: SocketAddr,
    max_payload: usize,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self {
            server_addr,
            max_payload: CLASSIC_UDP_PAYLOAD,
        }
    }

    /// Largest datagram accepted as a complete answer. Anything bigger is
    /// handed back anyway so the caller can re-ask over TCP.
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload.max(CLASSIC_UDP_PAYLOAD);
        self
    }

    pub fn max_payload(&self) -> usize {
        self.max_payload
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let server = self.server_addr;
        let deadline = Instant::now() + timeout;
        let (expected_id, _) = Header::peek(message_bytes)
            .ok_or_else(|| TransportError::network(server, "query shorter than a header"))?;

        // Bind to ephemeral port (0 = OS assigns)
        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| TransportError::network(server, format!("bind failed: {}", e)))?;

        let bytes_sent = tokio::time::timeout_at(deadline, socket.send_to(message_bytes, server))
            .await
            .map_err(|_| TransportError::Timeout { server })?
            .map_err(|e| TransportError::network(server, e))?;

        debug!(server = %server, id = expected_id, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_MESSAGE_LEN];
        loop {
            let (bytes_received, from_addr) =
                tokio::time::timeout_at(deadline, socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| TransportError::Timeout { server })?
                    .map_err(|e| TransportError::network(server, e))?;

            if from_addr != server {
                warn!(
                    expected = %server,
                    received_from = %from_addr,
                    "UDP response from unexpected source, discarding"
                );
                continue;
            }

            match Header::peek(&recv_buf[..bytes_received]) {
                Some((id, _)) if id == expected_id => {}
                other => {
                    debug!(
                        server = %server,
                        expected_id = expected_id,
                        received_id = ?other.map(|(id, _)| id),
                        "Discarding UDP response with mismatched id"
                    );
                    continue;
                }
            }

            recv_buf.truncate(bytes_received);
            debug!(server = %server, bytes_received = bytes_received, "UDP response received");

            return Ok(TransportResponse {
                bytes: Bytes::from(recv_buf),
                protocol_used: "UDP",
            });
        }
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
