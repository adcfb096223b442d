//! Error types for the protocol layer.
//!
//! Each Roomcast crate defines its own error enum. A `ProtocolError`
//! always means a payload could not be turned into bytes or back, never
//! that the network or a room misbehaved.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed.
    ///
    /// Common causes: malformed JSON, a missing required field, or a
    /// timestamp that is not ISO-8601.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The payload decoded but violates a protocol rule.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
