//! UDP transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Standard DNS transport. Messages are sent as-is (no framing), received
//! into a 4096-byte buffer. If the response has the TC (truncated) bit set,
//! the caller should repeat the exchange over TCP.

use super::{decode, encode};
use async_trait::async_trait;
use ferrous_resolver_application::ports::DnsTransport;
use ferrous_resolver_domain::ResolverError;
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    timeout: Duration,
}

impl UdpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn lookup(
        &self,
        request: &Message,
        server: SocketAddr,
    ) -> Result<Message, ResolverError> {
        let message_bytes = encode(request)?;

        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if server.is_ipv4() {
            "0.0.0.0:0".parse().unwrap()
        } else {
            "[::]:0".parse().unwrap()
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| ResolverError::TransportIo {
                server: server.to_string(),
                reason: format!("failed to bind UDP socket: {}", e),
            })?;

        let bytes_sent = tokio::time::timeout(self.timeout, socket.send_to(&message_bytes, server))
            .await
            .map_err(|_| ResolverError::TransportTimeout {
                server: server.to_string(),
            })?
            .map_err(|e| ResolverError::TransportIo {
                server: server.to_string(),
                reason: format!("failed to send query: {}", e),
            })?;

        debug!(server = %server, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        let (bytes_received, from_addr) =
            tokio::time::timeout(self.timeout, socket.recv_from(&mut recv_buf))
                .await
                .map_err(|_| ResolverError::TransportTimeout {
                    server: server.to_string(),
                })?
                .map_err(|e| ResolverError::TransportIo {
                    server: server.to_string(),
                    reason: format!("failed to receive response: {}", e),
                })?;

        if from_addr.ip() != server.ip() {
            warn!(
                expected = %server,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        recv_buf.truncate(bytes_received);

        debug!(
            server = %server,
            bytes_received = bytes_received,
            "UDP response received"
        );

        decode(&recv_buf)
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udp_transport_creation() {
        let transport = UdpTransport::new(Duration::from_millis(2000));
        assert_eq!(transport.timeout, Duration::from_millis(2000));
        assert_eq!(transport.protocol_name(), "UDP");
    }
}
