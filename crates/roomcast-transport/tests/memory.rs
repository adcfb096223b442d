//! Integration tests for the in-process transport.
//!
//! These drive several nodes on one `MemoryNetwork` and check that
//! payloads reach exactly the subscribers they should.

#[cfg(feature = "memory")]
mod memory {
    use std::sync::{Arc, Mutex};

    use roomcast_transport::{
        MemoryNetwork, MessageHandler, PeerIdentity, PubSubTransport, Topic,
        TransportError,
    };

    /// Helper: a handler that records every payload it receives.
    fn recording_handler() -> (MessageHandler, Arc<Mutex<Vec<Vec<u8>>>>) {
        let inbox = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&inbox);
        let handler: MessageHandler = Arc::new(move |data: &[u8]| {
            sink.lock().unwrap().push(data.to_vec());
        });
        (handler, inbox)
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let network = MemoryNetwork::new();
        let a = network.node_with_identity("a");
        let b = network.node_with_identity("b");
        let topic = Topic::new("rooms/course-1");

        let (ha, inbox_a) = recording_handler();
        let (hb, inbox_b) = recording_handler();
        a.subscribe(&topic, ha).await.unwrap();
        b.subscribe(&topic, hb).await.unwrap();

        a.publish(&topic, b"hi").await.unwrap();

        assert_eq!(inbox_a.lock().unwrap().as_slice(), &[b"hi".to_vec()]);
        assert_eq!(inbox_b.lock().unwrap().as_slice(), &[b"hi".to_vec()]);
    }

    #[tokio::test]
    async fn test_publish_without_loopback_skips_self() {
        let network = MemoryNetwork::new();
        let a = network.node_with_identity("a");
        a.set_loopback(false);
        let topic = Topic::new("t");

        let (handler, inbox) = recording_handler();
        a.subscribe(&topic, handler).await.unwrap();
        a.publish(&topic, b"x").await.unwrap();

        assert!(inbox.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publish_does_not_cross_topics() {
        let network = MemoryNetwork::new();
        let a = network.node();
        let b = network.node();

        let (handler, inbox) = recording_handler();
        b.subscribe(&Topic::new("one"), handler).await.unwrap();
        a.publish(&Topic::new("two"), b"x").await.unwrap();

        assert!(inbox.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let network = MemoryNetwork::new();
        let a = network.node();
        let b = network.node();
        let topic = Topic::new("t");

        let (handler, inbox) = recording_handler();
        b.subscribe(&topic, handler).await.unwrap();
        b.unsubscribe(&topic).await.unwrap();
        a.publish(&topic, b"late").await.unwrap();

        assert!(inbox.lock().unwrap().is_empty());
        assert_eq!(network.subscriber_count(&topic), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_unknown_topic_fails() {
        let network = MemoryNetwork::new();
        let a = network.node();
        let result = a.unsubscribe(&Topic::new("never")).await;
        assert!(matches!(
            result,
            Err(TransportError::UnsubscribeFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_subscribe_twice_fails() {
        let network = MemoryNetwork::new();
        let a = network.node();
        let topic = Topic::new("t");
        let (handler, _) = recording_handler();
        a.subscribe(&topic, Arc::clone(&handler)).await.unwrap();
        let result = a.subscribe(&topic, handler).await;
        assert!(matches!(result, Err(TransportError::SubscribeFailed { .. })));
    }

    #[tokio::test]
    async fn test_offline_node_rejects_operations() {
        let network = MemoryNetwork::new();
        let a = network.node();
        a.set_online(false);
        let topic = Topic::new("t");

        assert!(matches!(
            a.local_identity().await,
            Err(TransportError::Offline(_))
        ));
        assert!(a.publish(&topic, b"x").await.is_err());
        assert!(a.list_peers(&topic).await.is_err());

        a.set_online(true);
        assert!(a.local_identity().await.is_ok());
    }

    #[tokio::test]
    async fn test_oversized_payload_rejected() {
        let network = MemoryNetwork::with_max_payload_size(4);
        let a = network.node();
        let result = a.publish(&Topic::new("t"), b"too long").await;
        assert!(matches!(result, Err(TransportError::PublishFailed { .. })));
    }

    #[tokio::test]
    async fn test_list_peers_excludes_self() {
        let network = MemoryNetwork::new();
        let a = network.node_with_identity("a");
        let b = network.node_with_identity("b");
        let c = network.node_with_identity("c");
        let topic = Topic::new("t");

        for node in [&a, &b, &c] {
            let (handler, _) = recording_handler();
            node.subscribe(&topic, handler).await.unwrap();
        }

        let peers = a.list_peers(&topic).await.unwrap();
        assert_eq!(peers, vec![PeerIdentity::new("b"), PeerIdentity::new("c")]);
    }

    #[tokio::test]
    async fn test_close_detaches_node() {
        let network = MemoryNetwork::new();
        let a = network.node();
        let topic = Topic::new("t");
        let (handler, _) = recording_handler();
        a.subscribe(&topic, handler).await.unwrap();

        a.close();

        assert_eq!(network.subscriber_count(&topic), 0);
        assert!(matches!(
            a.local_identity().await,
            Err(TransportError::Shutdown)
        ));
    }

    #[tokio::test]
    async fn test_dropped_node_leaves_topics() {
        let network = MemoryNetwork::new();
        let topic = Topic::new("t");
        {
            let a = network.node();
            let (handler, _) = recording_handler();
            a.subscribe(&topic, handler).await.unwrap();
            assert_eq!(network.subscriber_count(&topic), 1);
        }
        assert_eq!(network.subscriber_count(&topic), 0);
    }
}
