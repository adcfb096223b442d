//! In-process pub/sub transport.
//!
//! A [`MemoryNetwork`] is a shared hub; every [`MemoryTransport`] created
//! from it is one node. Publishing hands the payload to the handler of
//! every node subscribed to the topic, synchronously, from the
//! publisher's task. Useful for tests and local demos where a real
//! gossip network is not available.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{MessageHandler, PeerIdentity, PubSubTransport, Topic, TransportError};

/// Counter for generating unique node identities.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Largest payload a node accepts for publishing by default (64 KiB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 64 * 1024;

type Subscribers = HashMap<PeerIdentity, MessageHandler>;

struct NetworkState {
    topics: HashMap<Topic, Subscribers>,
    max_payload_size: usize,
}

/// Shared hub connecting [`MemoryTransport`] nodes.
///
/// Cheap to clone; all clones refer to the same hub.
#[derive(Clone)]
pub struct MemoryNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl MemoryNetwork {
    /// Creates an empty network with the default payload limit.
    pub fn new() -> Self {
        Self::with_max_payload_size(DEFAULT_MAX_PAYLOAD_SIZE)
    }

    /// Creates an empty network that rejects payloads above `limit` bytes.
    pub fn with_max_payload_size(limit: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(NetworkState {
                topics: HashMap::new(),
                max_payload_size: limit,
            })),
        }
    }

    /// Attaches a new node with a generated identity.
    pub fn node(&self) -> MemoryTransport {
        let id = NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed);
        self.node_with_identity(format!("mem-peer-{id}"))
    }

    /// Attaches a new node with the given identity.
    pub fn node_with_identity(&self, id: impl Into<String>) -> MemoryTransport {
        let identity = PeerIdentity::new(id);
        tracing::debug!(peer = %identity, "memory node attached");
        MemoryTransport {
            identity,
            network: self.clone(),
            online: AtomicBool::new(true),
            closed: AtomicBool::new(false),
            loopback: AtomicBool::new(true),
        }
    }

    /// Returns how many nodes are subscribed to `topic`.
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.lock().topics.get(topic).map_or(0, HashMap::len)
    }

    fn lock(&self) -> MutexGuard<'_, NetworkState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn detach(&self, peer: &PeerIdentity) {
        let mut state = self.lock();
        for subscribers in state.topics.values_mut() {
            subscribers.remove(peer);
        }
        state.topics.retain(|_, subscribers| !subscribers.is_empty());
    }
}

impl Default for MemoryNetwork {
    fn default() -> Self {
        Self::new()
    }
}

/// One node on a [`MemoryNetwork`].
///
/// By default a node receives its own publications (loopback), the way
/// a gossip mesh can route a message back to its origin. Tests toggle
/// [`set_online`](Self::set_online) to simulate a node that is down.
pub struct MemoryTransport {
    identity: PeerIdentity,
    network: MemoryNetwork,
    online: AtomicBool,
    closed: AtomicBool,
    loopback: AtomicBool,
}

impl MemoryTransport {
    /// Returns this node's identity without going through the trait.
    pub fn identity(&self) -> &PeerIdentity {
        &self.identity
    }

    /// Marks the node as reachable or not. While offline every operation
    /// fails with [`TransportError::Offline`]; existing subscriptions keep
    /// receiving.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
        tracing::debug!(peer = %self.identity, online, "memory node availability changed");
    }

    /// Controls whether this node's own publications are delivered back
    /// to its handlers.
    pub fn set_loopback(&self, loopback: bool) {
        self.loopback.store(loopback, Ordering::SeqCst);
    }

    /// Detaches the node from the network. Every later operation fails
    /// with [`TransportError::Shutdown`].
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.network.detach(&self.identity);
            tracing::debug!(peer = %self.identity, "memory node closed");
        }
    }

    fn ensure_available(&self) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Shutdown);
        }
        if !self.online.load(Ordering::SeqCst) {
            return Err(TransportError::Offline(format!(
                "node {} is not running",
                self.identity
            )));
        }
        Ok(())
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.close();
    }
}

impl PubSubTransport for MemoryTransport {
    type Error = TransportError;

    async fn local_identity(&self) -> Result<PeerIdentity, Self::Error> {
        self.ensure_available()?;
        Ok(self.identity.clone())
    }

    async fn subscribe(
        &self,
        topic: &Topic,
        handler: MessageHandler,
    ) -> Result<(), Self::Error> {
        self.ensure_available()?;
        let mut state = self.network.lock();
        let subscribers = state.topics.entry(topic.clone()).or_default();
        if subscribers.contains_key(&self.identity) {
            return Err(TransportError::SubscribeFailed {
                topic: topic.to_string(),
                reason: "already subscribed".into(),
            });
        }
        subscribers.insert(self.identity.clone(), handler);
        tracing::debug!(peer = %self.identity, %topic, "subscribed");
        Ok(())
    }

    async fn unsubscribe(&self, topic: &Topic) -> Result<(), Self::Error> {
        self.ensure_available()?;
        let mut state = self.network.lock();
        let removed = state
            .topics
            .get_mut(topic)
            .and_then(|subscribers| subscribers.remove(&self.identity));
        if removed.is_none() {
            return Err(TransportError::UnsubscribeFailed {
                topic: topic.to_string(),
                reason: "not subscribed".into(),
            });
        }
        if state.topics.get(topic).is_some_and(HashMap::is_empty) {
            state.topics.remove(topic);
        }
        tracing::debug!(peer = %self.identity, %topic, "unsubscribed");
        Ok(())
    }

    async fn publish(
        &self,
        topic: &Topic,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        self.ensure_available()?;
        let loopback = self.loopback.load(Ordering::SeqCst);

        // Collect handlers under the lock, invoke them after releasing it:
        // a handler is free to publish again.
        let handlers: Vec<MessageHandler> = {
            let state = self.network.lock();
            if data.len() > state.max_payload_size {
                return Err(TransportError::PublishFailed {
                    topic: topic.to_string(),
                    reason: format!(
                        "payload of {} bytes exceeds limit of {}",
                        data.len(),
                        state.max_payload_size
                    ),
                });
            }
            state
                .topics
                .get(topic)
                .map(|subscribers| {
                    subscribers
                        .iter()
                        .filter(|(peer, _)| loopback || **peer != self.identity)
                        .map(|(_, handler)| Arc::clone(handler))
                        .collect()
                })
                .unwrap_or_default()
        };

        tracing::trace!(
            peer = %self.identity,
            %topic,
            bytes = data.len(),
            receivers = handlers.len(),
            "publishing"
        );
        for handler in handlers {
            handler(data);
        }
        Ok(())
    }

    async fn list_peers(
        &self,
        topic: &Topic,
    ) -> Result<Vec<PeerIdentity>, Self::Error> {
        self.ensure_available()?;
        let state = self.network.lock();
        let mut peers: Vec<PeerIdentity> = state
            .topics
            .get(topic)
            .map(|subscribers| {
                subscribers
                    .keys()
                    .filter(|peer| **peer != self.identity)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        peers.sort();
        Ok(peers)
    }
}
