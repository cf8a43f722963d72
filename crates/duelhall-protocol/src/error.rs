//! Protocol-level errors.

/// Errors produced while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The received bytes are not a valid message.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// A structurally valid message arrived where it is not allowed
    /// (e.g. a command before `Hello`).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
