//! TCP transport for DNS queries (RFC 1035 §4.2.2)
//!
//! Messages are framed with a two-byte big-endian length prefix. Used for
//! exchanges the UDP path truncated, or directly when configured.

use super::{decode, encode};
use async_trait::async_trait;
use ferrous_resolver_application::ports::DnsTransport;
use ferrous_resolver_domain::ResolverError;
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

pub struct TcpTransport {
    timeout: Duration,
}

impl TcpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn connect(&self, server: SocketAddr) -> Result<TcpStream, ResolverError> {
        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(server))
            .await
            .map_err(|_| ResolverError::TransportTimeout {
                server: server.to_string(),
            })?
            .map_err(|e| ResolverError::TransportIo {
                server: server.to_string(),
                reason: format!("connection failed: {}", e),
            })?;

        stream
            .set_nodelay(true)
            .map_err(|e| ResolverError::TransportIo {
                server: server.to_string(),
                reason: format!("failed to set TCP_NODELAY: {}", e),
            })?;

        Ok(stream)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn lookup(
        &self,
        request: &Message,
        server: SocketAddr,
    ) -> Result<Message, ResolverError> {
        let message_bytes = encode(request)?;
        let mut stream = self.connect(server).await?;

        tokio::time::timeout(
            self.timeout,
            send_with_length_prefix(&mut stream, &message_bytes),
        )
        .await
        .map_err(|_| ResolverError::TransportTimeout {
            server: server.to_string(),
        })?
        .map_err(|e| ResolverError::TransportIo {
            server: server.to_string(),
            reason: format!("failed to send query: {}", e),
        })?;

        debug!(server = %server, message_len = message_bytes.len(), "TCP query sent");

        let response_bytes =
            tokio::time::timeout(self.timeout, read_with_length_prefix(&mut stream, server))
                .await
                .map_err(|_| ResolverError::TransportTimeout {
                    server: server.to_string(),
                })??;

        debug!(
            server = %server,
            response_len = response_bytes.len(),
            "TCP response received"
        );

        decode(&response_bytes)
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> std::io::Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    let length = message_bytes.len() as u16;
    stream.write_all(&length.to_be_bytes()).await?;
    stream.write_all(message_bytes).await?;
    stream.flush().await
}

pub(crate) async fn read_with_length_prefix<S>(
    stream: &mut S,
    server: SocketAddr,
) -> Result<Vec<u8>, ResolverError>
where
    S: AsyncReadExt + Unpin,
{
    let io_error = |e: std::io::Error| ResolverError::TransportIo {
        server: server.to_string(),
        reason: e.to_string(),
    };

    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.map_err(io_error)?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    if response_len > MAX_TCP_MESSAGE_SIZE {
        return Err(ResolverError::TransportIo {
            server: server.to_string(),
            reason: format!(
                "response too large: {} bytes (max {})",
                response_len, MAX_TCP_MESSAGE_SIZE
            ),
        });
    }

    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await.map_err(io_error)?;
    Ok(response)
}
