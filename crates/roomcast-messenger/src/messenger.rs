//! The messenger: joins rooms on the transport, sends and receives chat
//! messages, and emits them to listeners.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use roomcast_protocol::{ChatMessage, Codec, JsonCodec, RoomId, TopicMapper};
use roomcast_transport::{PeerIdentity, PubSubTransport, Topic};
use tokio::sync::Mutex;

use crate::event::{EventBus, EventReceiver, MessengerEvent};
use crate::room::{incoming_handler, RoomSubscription, SelfFilter, SubscriptionInfo};
use crate::{MessengerConfig, MessengerError};

/// Maps chat rooms onto pub/sub topics and reconciles local sends with
/// transport deliveries.
///
/// The messenger spawns nothing. Every operation runs on the caller's
/// task, and incoming messages arrive on whatever context the transport
/// invokes its callbacks from. Share it across tasks with `Arc`.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ initialize() ──→ join_room() ──→ send_message() ... ──→ shutdown()
///               │                 │
///               ▼                 ▼
///      TransportUnavailable  SubscriptionFailed
/// ```
pub struct Messenger<T: PubSubTransport, C: Codec + Clone = JsonCodec> {
    transport: T,
    codec: C,
    config: MessengerConfig,
    mapper: TopicMapper,

    /// Identity reported by the transport. Fetched once, then read-only.
    identity: Mutex<Option<PeerIdentity>>,

    /// `true` between a successful `initialize()` and `shutdown()`.
    connected: AtomicBool,

    /// Joined rooms. At most one subscription per room id.
    ///
    /// Held across transport subscribe/unsubscribe so joins and leaves
    /// are serialized. Subscription callbacks never take this lock.
    subscriptions: Mutex<HashMap<RoomId, RoomSubscription>>,

    events: Arc<EventBus>,
}

impl<T: PubSubTransport> Messenger<T, JsonCodec> {
    /// Creates a messenger with the default configuration and JSON codec.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, MessengerConfig::default())
    }

    /// Creates a messenger with the JSON codec.
    pub fn with_config(transport: T, config: MessengerConfig) -> Self {
        Self::with_codec(transport, JsonCodec, config)
    }
}

impl<T: PubSubTransport, C: Codec + Clone> Messenger<T, C> {
    /// Creates a messenger with a custom codec.
    pub fn with_codec(transport: T, codec: C, config: MessengerConfig) -> Self {
        let mapper = TopicMapper::new(config.topic_namespace.clone());
        Self {
            transport,
            codec,
            config,
            mapper,
            identity: Mutex::new(None),
            connected: AtomicBool::new(false),
            subscriptions: Mutex::new(HashMap::new()),
            events: Arc::new(EventBus::default()),
        }
    }

    /// Fetches this node's identity from the transport.
    ///
    /// Calling it again after success returns the cached identity
    /// without touching the transport; calling it after a failure
    /// retries.
    ///
    /// # Errors
    /// Returns [`MessengerError::TransportUnavailable`] if the transport
    /// cannot report an identity.
    pub async fn initialize(&self) -> Result<PeerIdentity, MessengerError> {
        let mut identity = self.identity.lock().await;
        if let Some(existing) = identity.as_ref() {
            if self.is_connected() {
                return Ok(existing.clone());
            }
        }

        let fetched = match self.transport.local_identity().await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(error = %e, "messenger initialization failed");
                return Err(MessengerError::TransportUnavailable(Box::new(e)));
            }
        };

        if let Some(previous) = identity.as_ref() {
            if *previous != fetched {
                tracing::warn!(
                    %previous,
                    current = %fetched,
                    "transport identity changed, keeping the original"
                );
            }
        }
        let peer = identity.get_or_insert(fetched).clone();
        self.connected.store(true, Ordering::SeqCst);
        tracing::info!(%peer, "messenger initialized");
        Ok(peer)
    }

    /// Joins `room_id` on behalf of `participant_id`.
    ///
    /// Joining a room that is already joined succeeds without doing
    /// anything. Transport deliveries authored by `participant_id` are
    /// suppressed in this room.
    ///
    /// # Errors
    /// - [`MessengerError::TransportUnavailable`] before `initialize()`.
    /// - [`MessengerError::SubscriptionFailed`] if the transport refuses;
    ///   the room is then not joined.
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        participant_id: &str,
    ) -> Result<(), MessengerError> {
        self.ensure_connected()?;

        let mut subscriptions = self.subscriptions.lock().await;
        if subscriptions.contains_key(room_id) {
            tracing::debug!(%room_id, "room already joined");
            return Ok(());
        }

        let topic = self.mapper.topic_for(room_id);
        let filter = Arc::new(SelfFilter::seeded(participant_id));
        let handler = incoming_handler(
            room_id.clone(),
            self.codec.clone(),
            Arc::clone(&filter),
            Arc::clone(&self.events),
        );

        self.transport
            .subscribe(&topic, handler)
            .await
            .map_err(|e| MessengerError::SubscriptionFailed {
                room: room_id.clone(),
                source: Box::new(e),
            })?;

        subscriptions.insert(
            room_id.clone(),
            RoomSubscription {
                topic: topic.clone(),
                participant_id: participant_id.to_string(),
                filter,
            },
        );
        tracing::info!(%room_id, %topic, participant = participant_id, "room joined");
        Ok(())
    }

    /// Sends a chat message to a joined room.
    ///
    /// On success the message is also emitted to local listeners before
    /// this returns, so the sender sees it without waiting for the
    /// network. Returns the message as sent.
    ///
    /// # Errors
    /// - [`MessengerError::TransportUnavailable`] before `initialize()`.
    /// - [`MessengerError::RoomNotJoined`] if `room_id` is not joined;
    ///   nothing is published.
    /// - [`MessengerError::Protocol`] if the message cannot be encoded.
    /// - [`MessengerError::PublishFailed`] if the transport rejects it;
    ///   no local echo is emitted.
    pub async fn send_message(
        &self,
        room_id: &RoomId,
        sender_id: &str,
        sender_name: &str,
        content: &str,
    ) -> Result<ChatMessage, MessengerError> {
        self.ensure_connected()?;

        // Don't hold the map lock while publishing: the transport may
        // deliver back into this messenger synchronously.
        let (topic, filter) = {
            let subscriptions = self.subscriptions.lock().await;
            let subscription = subscriptions
                .get(room_id)
                .ok_or_else(|| MessengerError::RoomNotJoined(room_id.clone()))?;
            (subscription.topic.clone(), Arc::clone(&subscription.filter))
        };

        let message = ChatMessage::with_id_suffix_len(
            sender_id,
            sender_name,
            content,
            self.config.message_id_suffix_len,
        );
        let payload = self.codec.encode(&message)?;

        // Registered before publishing so an immediate echo-back is
        // already filtered.
        filter.record(&message.sender_id);

        self.transport
            .publish(&topic, &payload)
            .await
            .map_err(|e| MessengerError::PublishFailed {
                room: room_id.clone(),
                source: Box::new(e),
            })?;

        tracing::debug!(
            %room_id,
            message_id = %message.message_id,
            bytes = payload.len(),
            "message published"
        );
        self.events.emit(MessengerEvent::Message {
            room_id: room_id.clone(),
            message: message.clone(),
        });
        Ok(message)
    }

    /// Leaves `room_id`. Leaving a room that is not joined does nothing.
    ///
    /// The room is forgotten even if the transport fails to unsubscribe;
    /// that failure is only logged.
    pub async fn leave_room(&self, room_id: &RoomId) {
        let mut subscriptions = self.subscriptions.lock().await;
        let Some(subscription) = subscriptions.remove(room_id) else {
            tracing::debug!(%room_id, "leave for room not joined");
            return;
        };
        self.unsubscribe(room_id, &subscription.topic).await;
    }

    /// Lists the peers the transport sees on `room_id`'s topic.
    ///
    /// Returns an empty list if the transport fails; the failure is
    /// logged.
    pub async fn list_peers(&self, room_id: &RoomId) -> Vec<PeerIdentity> {
        let topic = self.mapper.topic_for(room_id);
        match self.transport.list_peers(&topic).await {
            Ok(peers) => peers,
            Err(e) => {
                let err = MessengerError::PeerListFailed {
                    room: room_id.clone(),
                    source: Box::new(e),
                };
                tracing::warn!(%room_id, error = %err, "peer listing failed");
                Vec::new()
            }
        }
    }

    /// Leaves every joined room and marks the messenger disconnected.
    ///
    /// Each leave is best-effort, as in [`leave_room`](Self::leave_room).
    pub async fn shutdown(&self) {
        let mut subscriptions = self.subscriptions.lock().await;
        let rooms: Vec<(RoomId, RoomSubscription)> = subscriptions.drain().collect();
        for (room_id, subscription) in &rooms {
            self.unsubscribe(room_id, &subscription.topic).await;
        }
        self.connected.store(false, Ordering::SeqCst);
        tracing::info!(rooms = rooms.len(), "messenger shut down");
    }

    /// Registers a new event listener.
    ///
    /// Each listener receives every event emitted after it registered.
    /// Dropping the receiver unregisters it.
    pub fn events(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Returns how many event listeners are registered.
    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    /// Returns the identity fetched by `initialize()`, if any.
    pub async fn identity(&self) -> Option<PeerIdentity> {
        self.identity.lock().await.clone()
    }

    /// Returns `true` if the messenger is initialized and not shut down.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Returns `true` if `room_id` is currently joined.
    pub async fn is_joined(&self, room_id: &RoomId) -> bool {
        self.subscriptions.lock().await.contains_key(room_id)
    }

    /// Lists every joined room.
    pub async fn joined_rooms(&self) -> Vec<SubscriptionInfo> {
        let subscriptions = self.subscriptions.lock().await;
        let mut rooms: Vec<SubscriptionInfo> = subscriptions
            .iter()
            .map(|(room_id, subscription)| SubscriptionInfo {
                room_id: room_id.clone(),
                topic: subscription.topic.clone(),
                participant_id: subscription.participant_id.clone(),
            })
            .collect();
        rooms.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        rooms
    }

    /// Returns the transport topic `room_id` maps to.
    pub fn topic_for(&self, room_id: &RoomId) -> Topic {
        self.mapper.topic_for(room_id)
    }

    /// Returns the configuration this messenger was built with.
    pub fn config(&self) -> &MessengerConfig {
        &self.config
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn ensure_connected(&self) -> Result<(), MessengerError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(MessengerError::TransportUnavailable(
                "messenger is not initialized".into(),
            ))
        }
    }

    /// Unsubscribes from `topic`, logging and absorbing any failure.
    async fn unsubscribe(&self, room_id: &RoomId, topic: &Topic) {
        match self.transport.unsubscribe(topic).await {
            Ok(()) => tracing::info!(%room_id, "room left"),
            Err(e) => {
                let err = MessengerError::UnsubscribeFailed {
                    room: room_id.clone(),
                    source: Box::new(e),
                };
                tracing::warn!(
                    %room_id,
                    error = %err,
                    "unsubscribe failed, room dropped anyway"
                );
            }
        }
    }
}
