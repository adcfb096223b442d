//! Events emitted by the messenger and the listener list they go through.

use std::sync::Mutex;

use roomcast_protocol::{ChatMessage, RoomId};
use tokio::sync::mpsc;

/// Something the messenger tells its listeners about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessengerEvent {
    /// A chat message for a joined room: either a local echo of a send
    /// or a message delivered by the transport from another participant.
    Message { room_id: RoomId, message: ChatMessage },
}

/// Receiving half handed to an event listener.
pub type EventReceiver = mpsc::UnboundedReceiver<MessengerEvent>;

/// Fan-out of events to every registered listener.
///
/// Shared between the messenger (local echo) and every subscription
/// callback (remote messages), so it is guarded by a plain mutex: the
/// callbacks are synchronous.
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    listeners: Mutex<Vec<mpsc::UnboundedSender<MessengerEvent>>>,
}

impl EventBus {
    /// Registers a new listener.
    pub(crate) fn subscribe(&self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    /// Delivers `event` to every listener, dropping listeners whose
    /// receiver is gone.
    pub(crate) fn emit(&self, event: MessengerEvent) {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.retain(|tx| tx.send(event.clone()).is_ok());
        if listeners.is_empty() {
            tracing::trace!("event emitted with no listeners");
        }
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(content: &str) -> MessengerEvent {
        MessengerEvent::Message {
            room_id: RoomId::new("r"),
            message: ChatMessage::new("u1", "Alice", content),
        }
    }

    #[test]
    fn test_emit_reaches_every_listener() {
        let bus = EventBus::default();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        let ev = event("hi");
        bus.emit(ev.clone());

        assert_eq!(a.try_recv().unwrap(), ev);
        assert_eq!(b.try_recv().unwrap(), ev);
    }

    #[test]
    fn test_emit_prunes_closed_listeners() {
        let bus = EventBus::default();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.listener_count(), 2);

        bus.emit(event("hi"));

        assert_eq!(bus.listener_count(), 1);
        drop(kept);
    }

    #[test]
    fn test_emit_without_listeners_is_harmless() {
        let bus = EventBus::default();
        bus.emit(event("into the void"));
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_emit_preserves_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        for i in 0..5 {
            bus.emit(event(&i.to_string()));
        }
        for i in 0..5 {
            let MessengerEvent::Message { message, .. } = rx.try_recv().unwrap();
            assert_eq!(message.content, i.to_string());
        }
    }
}
