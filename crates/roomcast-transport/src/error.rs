/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The underlying node is not running or cannot be reached.
    #[error("transport offline: {0}")]
    Offline(String),

    /// Registering interest in a topic failed.
    #[error("subscribe to {topic} failed: {reason}")]
    SubscribeFailed { topic: String, reason: String },

    /// Dropping interest in a topic failed.
    #[error("unsubscribe from {topic} failed: {reason}")]
    UnsubscribeFailed { topic: String, reason: String },

    /// The network refused a published payload.
    #[error("publish to {topic} failed: {reason}")]
    PublishFailed { topic: String, reason: String },

    /// The transport was shut down.
    #[error("transport shut down")]
    Shutdown,
}
