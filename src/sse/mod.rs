use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    RwLock,
};
use uuid::Uuid;

pub mod events;

pub use events::StreamEvent;

/// Unique identifier for one `/stream` connection.
///
/// Each connection gets a fresh id when it registers; identities are
/// never reused, so a reconnecting client is always a new subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber entry with ID and its event sender
struct Subscriber {
    id: SubscriberId,
    sender: UnboundedSender<StreamEvent>,
}

/// Named-channel publish/subscribe registry behind the SSE endpoints.
///
/// Channels are created lazily by the first subscribe or publish and
/// live for the lifetime of the process. Membership is pruned when a
/// write to a subscriber fails; besides the periodic pings that is the
/// only liveness signal.
#[derive(Default, Clone)]
pub struct ChannelHub {
    // channel name -> current subscribers
    channels: Arc<RwLock<HashMap<String, Vec<Subscriber>>>>,
}

impl ChannelHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber on `channel`.
    ///
    /// The `connected` handshake is queued on the returned receiver
    /// before registration completes, so it is always the first event
    /// the client sees.
    pub async fn subscribe(&self, channel: &str) -> (SubscriberId, UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = unbounded_channel();
        let id = SubscriberId::new();

        // rx is alive here, the handshake write cannot fail
        let _ = tx.send(StreamEvent::connected(id.as_uuid(), channel));

        let mut guard = self.channels.write().await;
        let subscribers = guard.entry(channel.to_string()).or_default();
        subscribers.push(Subscriber { id, sender: tx });

        tracing::debug!(
            channel,
            total = subscribers.len(),
            "registered subscriber {}",
            id.as_uuid()
        );

        (id, rx)
    }

    /// Remove a specific subscriber from a channel.
    ///
    /// The channel entry itself is kept even when it empties; channel
    /// count is small and fixed at this scale.
    pub async fn remove_subscriber(&self, channel: &str, id: SubscriberId) {
        let mut guard = self.channels.write().await;

        if let Some(subscribers) = guard.get_mut(channel) {
            let before = subscribers.len();
            subscribers.retain(|s| s.id != id);

            if subscribers.len() != before {
                tracing::debug!(
                    channel,
                    remaining = subscribers.len(),
                    "removed subscriber {}",
                    id.as_uuid()
                );
            }
        }
    }

    /// Fan `event` out to every current subscriber of `channel`,
    /// creating the channel if it does not exist yet.
    ///
    /// Best-effort: a failed write drops that subscriber and never
    /// affects delivery to the rest. Returns the number of subscribers
    /// the event was handed to.
    pub async fn broadcast(&self, channel: &str, event: StreamEvent) -> usize {
        let mut guard = self.channels.write().await;
        let subscribers = guard.entry(channel.to_string()).or_default();
        let before = subscribers.len();

        subscribers.retain(|subscriber| subscriber.sender.send(event.clone()).is_ok());

        let delivered = subscribers.len();
        if delivered != before {
            tracing::debug!(
                channel,
                pruned = before - delivered,
                active = delivered,
                "dead subscribers cleaned up during broadcast"
            );
        }

        delivered
    }

    /// Send a keepalive ping to a single subscriber.
    ///
    /// Returns `false` when the subscriber is gone or its stream is
    /// closed; a dead subscriber is removed before returning.
    pub async fn ping(&self, channel: &str, id: SubscriberId) -> bool {
        let mut guard = self.channels.write().await;

        let Some(subscribers) = guard.get_mut(channel) else {
            return false;
        };
        let Some(subscriber) = subscribers.iter().find(|s| s.id == id) else {
            return false;
        };

        if subscriber.sender.send(StreamEvent::ping()).is_ok() {
            true
        } else {
            subscribers.retain(|s| s.id != id);
            tracing::debug!(channel, "keepalive failed, dropped subscriber {}", id.as_uuid());
            false
        }
    }

    /// Get subscriber count for a channel
    pub async fn subscriber_count(&self, channel: &str) -> usize {
        let guard = self.channels.read().await;
        guard.get(channel).map(|v| v.len()).unwrap_or(0)
    }

    /// Per-channel subscriber counts, for the status endpoint
    pub async fn channel_counts(&self) -> HashMap<String, usize> {
        let guard = self.channels.read().await;
        guard.iter().map(|(k, v)| (k.clone(), v.len())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hub_starts_empty() {
        let hub = ChannelHub::new();
        assert_eq!(hub.subscriber_count("hospital").await, 0);
        assert!(hub.channel_counts().await.is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_receives_connected_handshake_first() {
        let hub = ChannelHub::new();
        let (id, mut rx) = hub.subscribe("hospital").await;

        assert_eq!(hub.subscriber_count("hospital").await, 1);

        let first = rx.recv().await.unwrap();
        match first {
            StreamEvent::Connected {
                client_id, channel, ..
            } => {
                assert_eq!(client_id, id.as_uuid());
                assert_eq!(channel, "hospital");
            }
            other => panic!("expected connected handshake, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_subscribers_with_equal_content() {
        let hub = ChannelHub::new();
        let (_, mut rx1) = hub.subscribe("hospital").await;
        let (_, mut rx2) = hub.subscribe("hospital").await;

        // Drain handshakes
        rx1.recv().await.unwrap();
        rx2.recv().await.unwrap();

        let event = StreamEvent::notify(
            "Ambulance en route to X".to_string(),
            "h1".to_string(),
            serde_json::json!({ "etaMin": 7 }),
        );
        let delivered = hub.broadcast("hospital", event.clone()).await;
        assert_eq!(delivered, 2);

        let got1 = rx1.recv().await.unwrap();
        let got2 = rx2.recv().await.unwrap();
        assert_eq!(got1, event);
        assert_eq!(got2, event);
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_channel_is_noop() {
        let hub = ChannelHub::new();
        let delivered = hub
            .broadcast("hospital", StreamEvent::notify("m".into(), "".into(), serde_json::json!({})))
            .await;
        assert_eq!(delivered, 0);

        // The channel entry was created lazily and persists
        assert!(hub.channel_counts().await.contains_key("hospital"));
    }

    #[tokio::test]
    async fn test_channel_isolation() {
        let hub = ChannelHub::new();
        let (_, mut rx) = hub.subscribe("hospital").await;
        rx.recv().await.unwrap();

        hub.broadcast(
            "traffic",
            StreamEvent::notify("other channel".into(), "".into(), serde_json::json!({})),
        )
        .await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnected_subscriber_pruned_on_broadcast() {
        let hub = ChannelHub::new();
        let (_, rx1) = hub.subscribe("hospital").await;
        let (_, mut rx2) = hub.subscribe("hospital").await;
        rx2.recv().await.unwrap();

        drop(rx1);

        let event = StreamEvent::notify("m".into(), "h2".into(), serde_json::json!({}));
        let delivered = hub.broadcast("hospital", event.clone()).await;

        assert_eq!(delivered, 1);
        assert_eq!(hub.subscriber_count("hospital").await, 1);
        assert_eq!(rx2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_ping_live_subscriber() {
        let hub = ChannelHub::new();
        let (id, mut rx) = hub.subscribe("hospital").await;
        rx.recv().await.unwrap();

        assert!(hub.ping("hospital", id).await);
        assert!(matches!(rx.recv().await.unwrap(), StreamEvent::Ping { .. }));
    }

    #[tokio::test]
    async fn test_ping_dead_subscriber_removes_it() {
        let hub = ChannelHub::new();
        let (id, rx) = hub.subscribe("hospital").await;
        drop(rx);

        assert!(!hub.ping("hospital", id).await);
        assert_eq!(hub.subscriber_count("hospital").await, 0);

        // Gone means gone: a second ping finds nothing
        assert!(!hub.ping("hospital", id).await);
    }

    #[tokio::test]
    async fn test_ping_unknown_channel() {
        let hub = ChannelHub::new();
        assert!(!hub.ping("nope", SubscriberId::new()).await);
    }

    #[tokio::test]
    async fn test_remove_subscriber_keeps_channel_entry() {
        let hub = ChannelHub::new();
        let (id, _rx) = hub.subscribe("hospital").await;

        hub.remove_subscriber("hospital", id).await;

        assert_eq!(hub.subscriber_count("hospital").await, 0);
        assert_eq!(hub.channel_counts().await.get("hospital"), Some(&0));
    }

    #[tokio::test]
    async fn test_per_subscriber_ordering() {
        let hub = ChannelHub::new();
        let (_, mut rx) = hub.subscribe("hospital").await;

        for i in 0..3 {
            hub.broadcast(
                "hospital",
                StreamEvent::notify(format!("msg {i}"), "h1".into(), serde_json::json!({})),
            )
            .await;
        }

        // Handshake first, then notifications in issuance order
        assert!(matches!(
            rx.recv().await.unwrap(),
            StreamEvent::Connected { .. }
        ));
        for i in 0..3 {
            match rx.recv().await.unwrap() {
                StreamEvent::Notify { message, .. } => assert_eq!(message, format!("msg {i}")),
                other => panic!("expected notify, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_fresh_identity_per_subscription() {
        let hub = ChannelHub::new();
        let (first, rx) = hub.subscribe("hospital").await;
        drop(rx);
        hub.remove_subscriber("hospital", first).await;

        let (second, _rx) = hub.subscribe("hospital").await;
        assert_ne!(first, second);
    }
}
