//! Ferrous Resolver Infrastructure Layer
//!
//! Adapters behind the application ports: the actual UDP/TCP exchanges,
//! including wire encode/decode via `hickory-proto`.
pub mod transport;

pub use transport::{create_transport, FallbackTransport, TcpTransport, UdpTransport};
