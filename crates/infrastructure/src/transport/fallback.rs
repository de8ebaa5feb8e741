//! UDP with TCP retry on truncation.
//!
//! The iterator itself only logs the TC bit; honoring the
//! `retry_tcp_on_truncation` option is this adapter's job.

use super::tcp::TcpTransport;
use super::udp::UdpTransport;
use async_trait::async_trait;
use ferrous_resolver_application::ports::DnsTransport;
use ferrous_resolver_domain::ResolverError;
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

pub struct FallbackTransport {
    udp: UdpTransport,
    tcp: TcpTransport,
}

impl FallbackTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            udp: UdpTransport::new(timeout),
            tcp: TcpTransport::new(timeout),
        }
    }
}

#[async_trait]
impl DnsTransport for FallbackTransport {
    async fn lookup(
        &self,
        request: &Message,
        server: SocketAddr,
    ) -> Result<Message, ResolverError> {
        let response = self.udp.lookup(request, server).await?;
        if response.truncated() {
            debug!(server = %server, "truncated response, repeating over TCP");
            return self.tcp.lookup(request, server).await;
        }
        Ok(response)
    }

    fn protocol_name(&self) -> &'static str {
        "UDP+TCP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_transport_creation() {
        let transport = FallbackTransport::new(Duration::from_millis(2000));
        assert_eq!(transport.protocol_name(), "UDP+TCP");
    }
}
