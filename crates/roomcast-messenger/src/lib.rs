//! Room messaging on top of a pub/sub transport.
//!
//! A [`Messenger`] maps chat rooms onto transport topics, keeps one
//! subscription per joined room, publishes outgoing messages with an
//! immediate local echo, and filters incoming deliveries before handing
//! them to listeners.
//!
//! # Key types
//!
//! - [`Messenger`] — join/leave rooms, send messages, list peers
//! - [`MessengerEvent`] — what listeners receive
//! - [`MessengerConfig`] — topic namespace and message id settings
//! - [`MessengerError`] — failures surfaced to callers

mod config;
mod error;
mod event;
mod messenger;
mod room;

pub use config::MessengerConfig;
pub use error::{BoxError, MessengerError};
pub use event::{EventReceiver, MessengerEvent};
pub use messenger::Messenger;
pub use room::SubscriptionInfo;
