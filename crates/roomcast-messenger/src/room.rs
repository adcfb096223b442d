//! Per-room subscription state and the incoming-message callback.
//!
//! Each joined room owns a [`SelfFilter`]: the set of sender ids that
//! this messenger speaks for in that room. Transport deliveries from
//! those senders are dropped because the local echo already emitted
//! them. The filter lives and dies with the subscription, so a leave
//! followed by a join starts from a clean slate.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use roomcast_protocol::{ChatMessage, Codec, RoomId};
use roomcast_transport::{MessageHandler, Topic};

use crate::event::{EventBus, MessengerEvent};

/// Bookkeeping for one joined room.
pub(crate) struct RoomSubscription {
    pub(crate) topic: Topic,
    pub(crate) participant_id: String,
    pub(crate) filter: Arc<SelfFilter>,
}

/// A read-only snapshot of one joined room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionInfo {
    /// The room's id.
    pub room_id: RoomId,
    /// Transport topic the room is mapped to.
    pub topic: Topic,
    /// Participant that joined the room on this messenger.
    pub participant_id: String,
}

/// Sender ids whose transport deliveries are suppressed in one room.
///
/// NOTE: matching is by sender id only, so a second device logged in as
/// the same user also has its messages suppressed here.
#[derive(Debug, Default)]
pub(crate) struct SelfFilter {
    senders: Mutex<HashSet<String>>,
}

impl SelfFilter {
    /// A filter that already knows the joining participant.
    pub(crate) fn seeded(participant_id: &str) -> Self {
        let filter = Self::default();
        filter.record(participant_id);
        filter
    }

    /// Adds a local sender.
    pub(crate) fn record(&self, sender_id: &str) {
        let mut senders = self.senders.lock().unwrap_or_else(|e| e.into_inner());
        if !senders.contains(sender_id) {
            senders.insert(sender_id.to_string());
        }
    }

    /// Returns `true` if `sender_id` is one of ours.
    pub(crate) fn is_local(&self, sender_id: &str) -> bool {
        self.senders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(sender_id)
    }
}

/// Builds the transport callback for `room_id`: decode, drop malformed
/// or self-originated payloads, emit the rest.
///
/// The callback never touches the subscription map, so it stays valid
/// (emitting only) if the transport fires it after the room was left.
pub(crate) fn incoming_handler<C>(
    room_id: RoomId,
    codec: C,
    filter: Arc<SelfFilter>,
    events: Arc<EventBus>,
) -> MessageHandler
where
    C: Codec + Clone,
{
    Arc::new(move |data: &[u8]| {
        let message: ChatMessage = match codec.decode(data) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(
                    %room_id,
                    error = %e,
                    bytes = data.len(),
                    "dropping undecodable payload"
                );
                return;
            }
        };

        if let Err(reason) = message.validate() {
            tracing::debug!(%room_id, %reason, "dropping invalid message");
            return;
        }

        if filter.is_local(&message.sender_id) {
            tracing::debug!(
                %room_id,
                message_id = %message.message_id,
                "dropping self-originated delivery"
            );
            return;
        }

        tracing::debug!(
            %room_id,
            sender = %message.sender_id,
            message_id = %message.message_id,
            "message received"
        );
        events.emit(MessengerEvent::Message {
            room_id: room_id.clone(),
            message,
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcast_protocol::JsonCodec;

    fn setup(participant: &str) -> (MessageHandler, crate::EventReceiver, Arc<SelfFilter>) {
        let bus = Arc::new(EventBus::default());
        let rx = bus.subscribe();
        let filter = Arc::new(SelfFilter::seeded(participant));
        let handler = incoming_handler(
            RoomId::new("course-101"),
            JsonCodec,
            Arc::clone(&filter),
            bus,
        );
        (handler, rx, filter)
    }

    fn payload(sender: &str, content: &str) -> Vec<u8> {
        JsonCodec
            .encode(&ChatMessage::new(sender, "Someone", content))
            .unwrap()
    }

    #[test]
    fn test_self_filter_seeded_with_participant() {
        let filter = SelfFilter::seeded("u1");
        assert!(filter.is_local("u1"));
        assert!(!filter.is_local("u2"));
        filter.record("u3");
        assert!(filter.is_local("u3"));
    }

    #[test]
    fn test_handler_emits_remote_message() {
        let (handler, mut rx, _) = setup("u2");
        handler(&payload("u1", "hello"));

        let MessengerEvent::Message { room_id, message } = rx.try_recv().unwrap();
        assert_eq!(room_id.as_str(), "course-101");
        assert_eq!(message.sender_id, "u1");
        assert_eq!(message.content, "hello");
    }

    #[test]
    fn test_handler_drops_self_originated() {
        let (handler, mut rx, filter) = setup("u2");
        filter.record("u7");
        handler(&payload("u2", "mine"));
        handler(&payload("u7", "also mine"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_handler_drops_garbage_without_panicking() {
        let (handler, mut rx, _) = setup("u2");
        handler(b"\xff\xfe not json");
        handler(br#"{"senderId":"u1","content":"no name"}"#);
        handler(b"");
        assert!(rx.try_recv().is_err());

        // The room still works afterwards.
        handler(&payload("u1", "still here"));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_handler_drops_empty_message_id() {
        let (handler, mut rx, _) = setup("u2");
        let mut message = ChatMessage::new("u1", "Alice", "hi");
        message.message_id.clear();
        handler(&JsonCodec.encode(&message).unwrap());
        assert!(rx.try_recv().is_err());
    }
}
