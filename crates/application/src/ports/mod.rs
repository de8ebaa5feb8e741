pub mod transport;

pub use transport::DnsTransport;
