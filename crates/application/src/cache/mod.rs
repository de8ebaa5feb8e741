pub mod address;
pub mod authority;
pub mod suffix;

pub use address::AddressCache;
pub use authority::AuthorityCache;
pub use suffix::SuffixCache;
