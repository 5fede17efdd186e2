//! TCP Transport for DNS queries (RFC 1035 §4.2.2, RFC 7766)
//!
//! Every message is preceded by a two-octet length. One connection per
//! query; the connection is closed once the answer is read.

use super::{DnsTransport, TransportError, TransportResponse};
use crate::dns::wire::Header;
use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tracing::debug;

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn connect(&self, deadline: Instant) -> Result<TcpStream, TransportError> {
        let server = self.server_addr;
        let stream = tokio::time::timeout_at(deadline, TcpStream::connect(server))
            .await
            .map_err(|_| TransportError::Timeout { server })?
            .map_err(|e| TransportError::network(server, format!("connect failed: {}", e)))?;

        stream
            .set_nodelay(true)
            .map_err(|e| TransportError::network(server, e))?;
        Ok(stream)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let server = self.server_addr;
        let deadline = Instant::now() + timeout;
        let (expected_id, _) = Header::peek(message_bytes)
            .ok_or_else(|| TransportError::network(server, "query shorter than a header"))?;

        let mut stream = self.connect(deadline).await?;

        tokio::time::timeout_at(deadline, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| TransportError::Timeout { server })?
            .map_err(|e| TransportError::network(server, e))?;

        debug!(server = %server, id = expected_id, message_len = message_bytes.len(), "TCP query sent");

        let response_bytes =
            tokio::time::timeout_at(deadline, read_with_length_prefix(&mut stream))
                .await
                .map_err(|_| TransportError::Timeout { server })?
                .map_err(|e| TransportError::network(server, e))?;

        match Header::peek(&response_bytes) {
            Some((id, _)) if id == expected_id => {}
            Some((id, _)) => {
                return Err(TransportError::network(
                    server,
                    format!("response id {} does not match query id {}", id, expected_id),
                ))
            }
            None => return Err(TransportError::network(server, "response shorter than a header")),
        }

        debug!(server = %server, response_len = response_bytes.len(), "TCP response received");

        Ok(TransportResponse {
            bytes: Bytes::from(response_bytes),
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

pub(crate) async fn send_with_length_prefix<S>(stream: &mut S, message_bytes: &[u8]) -> io::Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("message of {} bytes does not fit a length prefix", message_bytes.len()),
        )
    })?;

    // One write so the prefix and message share a segment.
    let mut framed = Vec::with_capacity(message_bytes.len() + 2);
    framed.extend_from_slice(&length.to_be_bytes());
    framed.extend_from_slice(message_bytes);

    stream.write_all(&framed).await?;
    stream.flush().await
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> io::Result<Vec<u8>>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await?;

    Ok(response)
}
