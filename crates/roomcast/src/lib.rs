//! # Roomcast
//!
//! Room-based real-time chat over a peer-to-peer pub/sub transport.
//!
//! Roomcast maps logical chat rooms (course chats, direct messages) onto
//! transport topics, keeps one subscription per joined room, echoes sent
//! messages locally, and filters the network's copies of them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomcast::prelude::*;
//!
//! # async fn run() -> Result<(), RoomcastError> {
//! let network = MemoryNetwork::new();
//! let messenger = RoomcastBuilder::new().build(network.node()).await?;
//! let mut events = messenger.events();
//!
//! let room = RoomId::course(101);
//! messenger.join_room(&room, "u1").await?;
//! messenger.send_message(&room, "u1", "Alice", "hello").await?;
//!
//! while let Some(MessengerEvent::Message { room_id, message }) = events.recv().await {
//!     println!("[{room_id}] {}: {}", message.sender_name, message.content);
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;

pub use builder::RoomcastBuilder;
pub use error::RoomcastError;

pub use roomcast_messenger as messenger;
pub use roomcast_protocol as protocol;
pub use roomcast_transport as transport;

/// Installs a `tracing` subscriber that reads its filter from `RUST_LOG`,
/// falling back to `default_filter` (e.g. `"info"` or `"roomcast=debug"`).
///
/// # Errors
/// Returns [`RoomcastError::Tracing`] if a global subscriber is already
/// installed.
pub fn init_tracing(default_filter: &str) -> Result<(), RoomcastError> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| RoomcastError::Tracing(e.to_string()))
}

/// Everything needed to run a messenger, in one import.
pub mod prelude {
    pub use crate::{init_tracing, RoomcastBuilder, RoomcastError};
    pub use roomcast_messenger::{
        EventReceiver, Messenger, MessengerConfig, MessengerError,
        MessengerEvent, SubscriptionInfo,
    };
    pub use roomcast_protocol::{ChatMessage, Codec, JsonCodec, RoomId, TopicMapper};
    pub use roomcast_transport::{
        MemoryNetwork, MemoryTransport, PeerIdentity, PubSubTransport, Topic,
    };
}
