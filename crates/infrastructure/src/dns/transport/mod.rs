pub mod exchange;
pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use bytes::Bytes;
use ferrous_resolver_domain::NameServer;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub use exchange::exchange;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("timeout talking to {server}")]
    Timeout { server: SocketAddr },

    #[error("network error talking to {server}: {reason}")]
    Network { server: SocketAddr, reason: String },

    #[error("{server} returned a truncated answer over TCP")]
    Truncated { server: SocketAddr },
}

impl TransportError {
    pub(crate) fn network(server: SocketAddr, reason: impl std::fmt::Display) -> Self {
        Self::Network {
            server,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Bytes,

    pub protocol_used: &'static str,
}

/// Single attempt, single server. Retrying and failover live in the engine.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
        }
    }
}

/// First-hop transport for `server`: UDP unless it is configured TCP-only.
pub fn create_transport(server: &NameServer, max_udp_payload: usize) -> Transport {
    match server {
        NameServer::Udp { addr } => {
            Transport::Udp(udp::UdpTransport::new(*addr).with_max_payload(max_udp_payload))
        }
        NameServer::Tcp { addr } => Transport::Tcp(tcp::TcpTransport::new(*addr)),
    }
}
