//! `RoomcastBuilder`: configures a messenger and brings it online.
//!
//! This is the usual entry point: it ties a transport to a
//! [`Messenger`], applies the configuration and runs `initialize()`, so
//! the caller gets back something that can join rooms right away.

use roomcast_messenger::{Messenger, MessengerConfig};
use roomcast_protocol::{Codec, JsonCodec};
use roomcast_transport::PubSubTransport;

use crate::RoomcastError;

/// Builder for configuring and starting a [`Messenger`].
///
/// # Example
///
/// ```rust,no_run
/// use roomcast::prelude::*;
///
/// # async fn run() -> Result<(), RoomcastError> {
/// let network = MemoryNetwork::new();
/// let messenger = RoomcastBuilder::new()
///     .topic_namespace("campus/")
///     .build(network.node())
///     .await?;
/// messenger.join_room(&RoomId::course(101), "u1").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoomcastBuilder {
    config: MessengerConfig,
}

impl RoomcastBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the topic namespace shared by every peer of the deployment.
    pub fn topic_namespace(mut self, namespace: &str) -> Self {
        self.config.topic_namespace = namespace.to_string();
        self
    }

    /// Sets the length of the random suffix of message ids.
    pub fn message_id_suffix_len(mut self, len: usize) -> Self {
        self.config.message_id_suffix_len = len;
        self
    }

    /// Replaces the whole messenger configuration.
    pub fn config(mut self, config: MessengerConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds an initialized messenger using the JSON codec.
    ///
    /// # Errors
    /// Fails with `MessengerError::TransportUnavailable` if the transport
    /// cannot report an identity.
    pub async fn build<T: PubSubTransport>(
        self,
        transport: T,
    ) -> Result<Messenger<T, JsonCodec>, RoomcastError> {
        self.build_with_codec(transport, JsonCodec).await
    }

    /// Builds an initialized messenger using a custom codec.
    pub async fn build_with_codec<T, C>(
        self,
        transport: T,
        codec: C,
    ) -> Result<Messenger<T, C>, RoomcastError>
    where
        T: PubSubTransport,
        C: Codec + Clone,
    {
        let messenger = Messenger::with_codec(transport, codec, self.config);
        let identity = messenger.initialize().await?;
        tracing::info!(
            %identity,
            namespace = %messenger.config().topic_namespace,
            "roomcast messenger ready"
        );
        Ok(messenger)
    }
}
