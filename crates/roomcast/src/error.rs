//! Unified error type for Roomcast.

use roomcast_messenger::MessengerError;
use roomcast_protocol::ProtocolError;
use roomcast_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `roomcast` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate. The
/// `#[from]` attributes let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RoomcastError {
    /// A transport-level error (offline node, refused publish).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A messenger-level error (not joined, publish failed, ...).
    #[error(transparent)]
    Messenger(#[from] MessengerError),

    /// Installing the global tracing subscriber failed.
    #[error("tracing setup failed: {0}")]
    Tracing(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcast_protocol::RoomId;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::Offline("node down".into());
        let roomcast_err: RoomcastError = err.into();
        assert!(matches!(roomcast_err, RoomcastError::Transport(_)));
        assert!(roomcast_err.to_string().contains("node down"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let roomcast_err: RoomcastError = err.into();
        assert!(matches!(roomcast_err, RoomcastError::Protocol(_)));
    }

    #[test]
    fn test_from_messenger_error() {
        let err = MessengerError::RoomNotJoined(RoomId::course(1));
        let roomcast_err: RoomcastError = err.into();
        assert!(matches!(roomcast_err, RoomcastError::Messenger(_)));
        assert_eq!(roomcast_err.to_string(), "room course-1 not joined");
    }
}
