//! Error types for the messenger layer.

use roomcast_protocol::{ProtocolError, RoomId};

/// Boxed transport error, kept as the `source` of messenger errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during messenger operations.
///
/// Only failures that would otherwise let a caller believe an action
/// succeeded are returned. `UnsubscribeFailed` and `PeerListFailed` are
/// built for the log line and then absorbed.
#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    /// The network layer cannot be reached, or the messenger has not been
    /// initialized (or was shut down).
    #[error("transport unavailable: {0}")]
    TransportUnavailable(#[source] BoxError),

    /// The transport refused the subscription; the room is not joined.
    #[error("failed to join room {room}: {source}")]
    SubscriptionFailed {
        room: RoomId,
        #[source]
        source: BoxError,
    },

    /// A send was attempted on a room this messenger never joined.
    #[error("room {0} not joined")]
    RoomNotJoined(RoomId),

    /// The transport rejected a publish. The message was not echoed
    /// locally and is not retried.
    #[error("failed to publish to room {room}: {source}")]
    PublishFailed {
        room: RoomId,
        #[source]
        source: BoxError,
    },

    /// Dropping the transport subscription failed. Never returned.
    #[error("failed to unsubscribe from room {room}: {source}")]
    UnsubscribeFailed {
        room: RoomId,
        #[source]
        source: BoxError,
    },

    /// Listing peers failed. Never returned.
    #[error("failed to list peers of room {room}: {source}")]
    PeerListFailed {
        room: RoomId,
        #[source]
        source: BoxError,
    },

    /// An outgoing message could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_not_joined_display() {
        let err = MessengerError::RoomNotJoined(RoomId::course(101));
        assert_eq!(err.to_string(), "room course-101 not joined");
    }

    #[test]
    fn test_publish_failed_keeps_source() {
        use std::error::Error;
        let err = MessengerError::PublishFailed {
            room: RoomId::new("r"),
            source: "network down".into(),
        };
        assert!(err.to_string().contains("network down"));
        assert_eq!(err.source().unwrap().to_string(), "network down");
    }

    #[test]
    fn test_from_protocol_error() {
        let err: MessengerError =
            ProtocolError::InvalidMessage("bad".into()).into();
        assert!(matches!(err, MessengerError::Protocol(_)));
    }
}
