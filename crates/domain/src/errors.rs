use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    #[error("Invalid domain name: {0}")]
    InvalidName(String),

    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    #[error("Domain name too long: {0} characters (max 255)")]
    NameTooLong(usize),

    #[error("Name server {0} is not part of the offered authority set")]
    ServerNotInSet(String),

    #[error("No name servers available for zone {0}")]
    NoServersAvailable(String),

    #[error("Response question does not echo the query: asked {asked}, answered {answered}")]
    QuestionMismatch { asked: String, answered: String },

    #[error("Ambiguous canonical name: more than one CNAME record owned by {0}")]
    AmbiguousCanonicalName(String),

    #[error("CNAME record for {0} points at itself")]
    CanonicalNameSelfReference(String),

    #[error("CNAME chain starting at {0} contains a cycle")]
    CanonicalNameCycle(String),

    #[error("Iteration limit of {0} steps exceeded")]
    IterationLimitExceeded(u32),

    #[error("Address resolution for name server {0} produced no addresses")]
    AddressResolutionFailed(String),

    #[error("Resolution ended without a terminal outcome")]
    NoOutcome,

    #[error("Response ID {received} does not match request ID {sent}")]
    ResponseIdMismatch { sent: u16, received: u16 },

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Transport error talking to {server}: {reason}")]
    TransportIo { server: String, reason: String },

    #[error("Failed to encode DNS message: {0}")]
    Encode(String),

    #[error("Failed to decode DNS message: {0}")]
    Decode(String),
}
