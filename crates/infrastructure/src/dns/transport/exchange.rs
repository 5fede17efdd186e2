use super::tcp::TcpTransport;
use super::udp::UdpTransport;
use super::{create_transport, Transport, TransportError, TransportResponse};
use crate::dns::wire::Header;
use ferrous_resolver_domain::NameServer;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// One query against one server, bounded by `timeout` as a whole.
///
/// UDP servers are asked over UDP first. A reply with TC set, or one larger
/// than `max_udp_payload`, is re-asked over TCP exactly once with the same
/// bytes. The TCP answer is final: if it is truncated too the attempt fails.
pub async fn exchange(
    server: &NameServer,
    message_bytes: &[u8],
    timeout: Duration,
    max_udp_payload: usize,
) -> Result<TransportResponse, TransportError> {
    let addr = server.socket_addr();
    let deadline = Instant::now() + timeout;

    let first = create_transport(server, max_udp_payload);
    let response = first.send(message_bytes, timeout).await?;

    let needs_tcp = match &first {
        Transport::Udp(udp) => udp_answer_incomplete(udp, &response),
        Transport::Tcp(_) => false,
    };

    if !needs_tcp {
        return reject_truncated_tcp(response, addr);
    }

    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Err(TransportError::Timeout { server: addr });
    }

    debug!(
        server = %addr,
        udp_len = response.bytes.len(),
        remaining_ms = remaining.as_millis() as u64,
        "UDP answer truncated, retrying over TCP"
    );

    let tcp = Transport::Tcp(TcpTransport::new(addr));
    let response = tcp.send(message_bytes, remaining).await?;
    reject_truncated_tcp(response, addr)
}

fn udp_answer_incomplete(udp: &UdpTransport, response: &TransportResponse) -> bool {
    let truncated = Header::peek(&response.bytes).is_some_and(|(_, tc)| tc);
    truncated || response.bytes.len() > udp.max_payload()
}

fn reject_truncated_tcp(
    response: TransportResponse,
    server: std::net::SocketAddr,
) -> Result<TransportResponse, TransportError> {
    let truncated = Header::peek(&response.bytes).is_some_and(|(_, tc)| tc);
    if truncated && response.protocol_used == "TCP" {
        return Err(TransportError::Truncated { server });
    }
    Ok(response)
}
