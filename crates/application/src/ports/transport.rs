use async_trait::async_trait;
use ferrous_resolver_domain::ResolverError;
use hickory_proto::op::Message;
use std::net::SocketAddr;

/// One request/response exchange with a name server.
///
/// Wire encoding and decoding belong to the adapter behind this port; the
/// resolution engine only ever sees decoded messages. The returned future is
/// the only suspension point of a resolution step.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn lookup(&self, request: &Message, server: SocketAddr)
        -> Result<Message, ResolverError>;

    fn protocol_name(&self) -> &'static str;
}
