//! The chat message record that travels between peers.

use chrono::{DateTime, SubsecRound, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Default number of random characters appended to a message id.
pub const DEFAULT_ID_SUFFIX_LEN: usize = 9;

/// Alphabet for message id suffixes (base 36, lowercase).
const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One chat message, exactly as it appears on the wire.
///
/// Built once by the sending messenger and never mutated afterwards.
/// On the wire it is a camelCase JSON object; all five fields are
/// required, so a payload missing any of them fails to decode.
///
/// ```json
/// { "senderId": "u1", "senderName": "Alice", "content": "hello",
///   "timestamp": "2026-10-18T09:30:00.120Z",
///   "messageId": "u1-1792315800120-k3j9x0a2b" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Opaque id of the participant who wrote the message.
    pub sender_id: String,
    /// Display name at send time. Not re-resolved later.
    pub sender_name: String,
    /// Message body.
    pub content: String,
    /// Creation time, assigned by the sender at publish time.
    pub timestamp: DateTime<Utc>,
    /// Sender-generated unique id, see [`generate_message_id`].
    pub message_id: String,
}

impl ChatMessage {
    /// Creates a message stamped with the current time and a fresh id.
    pub fn new(
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::with_id_suffix_len(
            sender_id,
            sender_name,
            content,
            DEFAULT_ID_SUFFIX_LEN,
        )
    }

    /// Like [`new`](Self::new) with a custom random suffix length for
    /// the message id.
    pub fn with_id_suffix_len(
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        content: impl Into<String>,
        suffix_len: usize,
    ) -> Self {
        let sender_id = sender_id.into();
        // Millisecond precision, like every other peer on the network.
        let timestamp = Utc::now().trunc_subsecs(3);
        let message_id = generate_message_id(&sender_id, timestamp, suffix_len);
        Self {
            sender_id,
            sender_name: sender_name.into(),
            content: content.into(),
            timestamp,
            message_id,
        }
    }

    /// Checks the rules a decoded payload must satisfy beyond its shape.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidMessage` if the sender id or message
    /// id is empty.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.sender_id.is_empty() {
            return Err(ProtocolError::InvalidMessage("empty senderId".into()));
        }
        if self.message_id.is_empty() {
            return Err(ProtocolError::InvalidMessage("empty messageId".into()));
        }
        Ok(())
    }
}

/// Builds a message id: `{sender_id}-{unix_millis}-{random_suffix}`.
///
/// Unique within a process in practice: two ids from the same sender in
/// the same millisecond differ only by the suffix.
pub fn generate_message_id(
    sender_id: &str,
    at: DateTime<Utc>,
    suffix_len: usize,
) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..suffix_len)
        .map(|_| {
            let idx = rng.random_range(0..ID_SUFFIX_ALPHABET.len());
            char::from(ID_SUFFIX_ALPHABET[idx])
        })
        .collect();
    format!("{sender_id}-{}-{suffix}", at.timestamp_millis())
}
