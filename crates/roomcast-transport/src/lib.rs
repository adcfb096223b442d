//! Transport abstraction layer for Roomcast.
//!
//! Provides the [`PubSubTransport`] trait that the messenger drives. A
//! production deployment binds it to a peer-to-peer gossip network; the
//! crate itself only ships an in-process hub for tests and demos.
//!
//! # Feature Flags
//!
//! - `memory` (default) — in-process pub/sub via [`MemoryNetwork`]

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "memory")]
mod memory;

pub use error::TransportError;
#[cfg(feature = "memory")]
pub use memory::{MemoryNetwork, MemoryTransport, DEFAULT_MAX_PAYLOAD_SIZE};

use std::fmt;
use std::sync::Arc;

/// Transport-level identity of a node on the pub/sub network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerIdentity(String);

impl PeerIdentity {
    /// Wraps a raw peer id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw peer id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a pub/sub channel on the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(String);

impl Topic {
    /// Wraps a raw topic string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the raw topic string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Callback invoked with the raw payload of every message delivered on a
/// subscribed topic.
///
/// Implementations may call it from any task or thread, so it must not
/// block and must not assume it runs in the subscriber's context.
pub type MessageHandler = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// A topic-based publish/subscribe network.
pub trait PubSubTransport: Send + Sync + 'static {
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns this node's identity on the network.
    ///
    /// Fails when the underlying node is not running.
    async fn local_identity(&self) -> Result<PeerIdentity, Self::Error>;

    /// Starts delivering messages published on `topic` to `handler`.
    async fn subscribe(
        &self,
        topic: &Topic,
        handler: MessageHandler,
    ) -> Result<(), Self::Error>;

    /// Stops delivery for `topic`. No handler invocation may start after
    /// this returns successfully.
    async fn unsubscribe(&self, topic: &Topic) -> Result<(), Self::Error>;

    /// Publishes `data` to every subscriber of `topic`.
    async fn publish(
        &self,
        topic: &Topic,
        data: &[u8],
    ) -> Result<(), Self::Error>;

    /// Lists the peers currently subscribed to `topic`.
    async fn list_peers(
        &self,
        topic: &Topic,
    ) -> Result<Vec<PeerIdentity>, Self::Error>;
}
