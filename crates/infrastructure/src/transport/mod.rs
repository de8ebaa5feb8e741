pub mod fallback;
pub mod tcp;
pub mod udp;

pub use fallback::FallbackTransport;
pub use tcp::TcpTransport;
pub use udp::UdpTransport;

use ferrous_resolver_application::ports::DnsTransport;
use ferrous_resolver_domain::{ResolverError, TransportConfig};
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::sync::Arc;
use std::time::Duration;

/// Build the transport the resolver config asks for.
pub fn create_transport(
    config: &TransportConfig,
    retry_tcp_on_truncation: bool,
) -> Arc<dyn DnsTransport> {
    let timeout = Duration::from_millis(config.query_timeout);
    if retry_tcp_on_truncation {
        Arc::new(FallbackTransport::new(timeout))
    } else {
        Arc::new(UdpTransport::new(timeout))
    }
}

pub(crate) fn encode(message: &Message) -> Result<Vec<u8>, ResolverError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message
        .emit(&mut encoder)
        .map_err(|e| ResolverError::Encode(e.to_string()))?;
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Message, ResolverError> {
    Message::from_vec(bytes).map_err(|e| ResolverError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::{MessageType, OpCode, Query};
    use hickory_proto::rr::{DNSClass, Name, RecordType};
    use std::str::FromStr;

    #[test]
    fn test_encode_decode_round_trip() {
        let mut query = Query::new();
        query.set_name(Name::from_str("example.com.").unwrap());
        query.set_query_type(RecordType::A);
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(false);
        message.add_query(query);

        let bytes = encode(&message).unwrap();
        assert!(bytes.len() >= 12, "DNS message too short: {} bytes", bytes.len());

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.id(), message.id());
        assert_eq!(decoded.queries().len(), 1);
        assert_eq!(decoded.queries()[0].name().to_utf8(), "example.com.");
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode(&[0u8; 3]).is_err());
    }
}
