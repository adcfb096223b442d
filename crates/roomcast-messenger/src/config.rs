//! Messenger configuration.

use roomcast_protocol::{DEFAULT_ID_SUFFIX_LEN, DEFAULT_TOPIC_NAMESPACE};
use serde::{Deserialize, Serialize};

/// Configuration for a [`Messenger`](crate::Messenger) instance.
///
/// Every messenger of one deployment must use the same
/// `topic_namespace`, otherwise they land on different topics for the
/// same room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessengerConfig {
    /// Prefix put in front of every room id to form its topic.
    pub topic_namespace: String,

    /// Number of random characters at the end of generated message ids.
    pub message_id_suffix_len: usize,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            topic_namespace: DEFAULT_TOPIC_NAMESPACE.to_string(),
            message_id_suffix_len: DEFAULT_ID_SUFFIX_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messenger_config_default() {
        let config = MessengerConfig::default();
        assert_eq!(config.topic_namespace, "roomcast/rooms/");
        assert_eq!(config.message_id_suffix_len, 9);
    }

    #[test]
    fn test_messenger_config_partial_json_fills_defaults() {
        let config: MessengerConfig =
            serde_json::from_str(r#"{"topic_namespace":"campus/"}"#).unwrap();
        assert_eq!(config.topic_namespace, "campus/");
        assert_eq!(config.message_id_suffix_len, 9);
    }
}
