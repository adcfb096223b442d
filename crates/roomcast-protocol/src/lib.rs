//! Wire protocol for Roomcast.
//!
//! This crate defines what travels over the pub/sub network and how
//! rooms are named:
//!
//! - **Messages** ([`ChatMessage`]) — the unit of communication.
//! - **Rooms** ([`RoomId`], [`TopicMapper`]) — logical room names and
//!   their mapping onto transport topics.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw bytes on topics)
//! and the messenger (room subscriptions). It knows nothing about
//! subscriptions; it only names rooms and shapes payloads.
//!
//! ```text
//! Transport (Topic, bytes) → Protocol (RoomId, ChatMessage) → Messenger
//! ```

mod codec;
mod error;
mod message;
mod room;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{generate_message_id, ChatMessage, DEFAULT_ID_SUFFIX_LEN};
pub use room::{RoomId, TopicMapper, DEFAULT_TOPIC_NAMESPACE};
