//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The messenger does not care how a [`ChatMessage`](crate::ChatMessage)
//! becomes bytes, only that something implements [`Codec`]. Every peer in
//! a deployment must use the same codec.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the messenger moves a copy of the
/// codec into every subscription callback, which the transport may run
/// on any thread.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// JSON is the interoperable wire format: browser clients and peers
/// written in other languages read the same camelCase object.
///
/// ## Example
///
/// ```rust
/// use roomcast_protocol::{ChatMessage, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let msg = ChatMessage::new("u1", "Alice", "hello");
///
/// let bytes = codec.encode(&msg).unwrap();
/// let decoded: ChatMessage = codec.decode(&bytes).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::ChatMessage;

    #[test]
    fn test_json_codec_rejects_garbage() {
        let result: Result<ChatMessage, _> = JsonCodec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_rejects_truncated_payload() {
        let bytes = JsonCodec
            .encode(&ChatMessage::new("u1", "Alice", "hi"))
            .unwrap();
        let result: Result<ChatMessage, _> =
            JsonCodec.decode(&bytes[..bytes.len() / 2]);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_codec_output_is_utf8_json_object() {
        let bytes = JsonCodec
            .encode(&ChatMessage::new("u1", "Alice", "héllo"))
            .unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.starts_with('{'));
        assert!(text.contains("héllo"));
    }
}
