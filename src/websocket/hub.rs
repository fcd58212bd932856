//! WebSocket Connection Hub
//!
//! Manages all WebSocket connections, their topic subscriptions, and the
//! relay from the gateway's event bus to connected dashboards.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::messages::{ServerMessage, WsEvent, ALL_TOPICS};
use crate::events::{EventBus, NotificationKind, Subscription};

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// Manages all WebSocket connections and subscriptions
pub struct ConnectionHub {
    /// Connections and topic subscriptions share one lock
    state: Arc<RwLock<HubState>>,
    config: HubConfig,
}

#[derive(Default)]
struct HubState {
    /// Active connections: ConnectionId → ConnectionHandle
    connections: HashMap<ConnectionId, ConnectionHandle>,
    /// Topic subscriptions: Topic → Set of ConnectionIds
    topics: HashMap<String, HashSet<ConnectionId>>,
}

impl HubState {
    fn forget(&mut self, id: &str, topic: &str) {
        if let Some(subscribers) = self.topics.get_mut(topic) {
            subscribers.remove(id);
            if subscribers.is_empty() {
                self.topics.remove(topic);
            }
        }
    }

    fn deliver(&self, event: &WsEvent) -> usize {
        let empty = HashSet::new();
        let direct = self.topics.get(&event.topic).unwrap_or(&empty);
        let wildcard = self.topics.get(ALL_TOPICS).unwrap_or(&empty);

        let mut sent = 0;
        for id in direct.union(wildcard) {
            if let Some(handle) = self.connections.get(id) {
                if handle.sender.send(event.message.clone()).is_ok() {
                    sent += 1;
                }
            }
        }

        if sent > 0 {
            tracing::trace!(topic = %event.topic, subscribers = sent, "Broadcast event");
        }
        sent
    }
}

/// Configuration for the connection hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

/// Handle for sending messages to a specific connection
pub struct ConnectionHandle {
    pub sender: mpsc::UnboundedSender<ServerMessage>,
    pub subscriptions: HashSet<String>,
}

impl ConnectionHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(HubState::default())),
            config,
        }
    }

    /// Forward every bus notification to subscribed connections
    ///
    /// Notifications are queued and delivered by a single task in the order
    /// they were published. The relay stops when the returned subscriptions
    /// are dropped. Must be called from within a tokio runtime.
    pub fn relay_from(self: &Arc<Self>, bus: &EventBus) -> Vec<Subscription> {
        let (tx, mut rx) = mpsc::unbounded_channel::<WsEvent>();

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                state.read().await.deliver(&event);
            }
            tracing::debug!("Notification relay stopped");
        });

        NotificationKind::all()
            .into_iter()
            .map(|kind| {
                let tx = tx.clone();
                bus.subscribe(kind, move |notification| {
                    let _ = tx.send(WsEvent::notification(notification));
                })
            })
            .collect()
    }

    /// Register a new WebSocket connection
    ///
    /// Returns the connection ID on success, or an error if the connection
    /// limit has been reached.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut state = self.state.write().await;
        if state.connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        state.connections.insert(
            id.clone(),
            ConnectionHandle {
                sender,
                subscriptions: HashSet::new(),
            },
        );

        tracing::info!(connection_id = %id, "WebSocket connected");
        Ok(id)
    }

    /// Unregister a connection and clean up its subscriptions
    pub async fn unregister(&self, id: &str) {
        let mut state = self.state.write().await;
        if let Some(handle) = state.connections.remove(id) {
            for topic in handle.subscriptions {
                state.forget(id, &topic);
            }
        }

        tracing::info!(connection_id = %id, "WebSocket disconnected");
    }

    /// Subscribe a connection to topics
    pub async fn subscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<String>, HubError> {
        let mut state = self.state.write().await;
        let HubState { connections, topics: subs } = &mut *state;
        let handle = connections.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        let mut subscribed = Vec::new();
        for topic in topics {
            if !is_valid_topic(&topic) {
                tracing::warn!(topic = %topic, "Invalid topic ignored");
                continue;
            }

            handle.subscriptions.insert(topic.clone());
            subs.entry(topic.clone()).or_default().insert(id.to_string());
            subscribed.push(topic);
        }

        tracing::debug!(connection_id = %id, topics = ?subscribed, "Subscribed to topics");
        Ok(subscribed)
    }

    /// Unsubscribe a connection from topics
    pub async fn unsubscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<String>, HubError> {
        let mut state = self.state.write().await;
        let handle = state
            .connections
            .get_mut(id)
            .ok_or(HubError::ConnectionNotFound)?;

        let removed: Vec<String> = topics
            .into_iter()
            .filter(|topic| handle.subscriptions.remove(topic))
            .collect();
        for topic in &removed {
            state.forget(id, topic);
        }

        tracing::debug!(connection_id = %id, topics = ?removed, "Unsubscribed from topics");
        Ok(removed)
    }

    /// Send an event to every subscriber of its topic
    ///
    /// Returns how many connections it was delivered to.
    pub async fn broadcast(&self, event: &WsEvent) -> usize {
        self.state.read().await.deliver(event)
    }

    /// Send a message directly to a specific connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let state = self.state.read().await;
        let handle = state.connections.get(id).ok_or(HubError::ConnectionNotFound)?;

        handle.sender.send(message).map_err(|_| HubError::SendFailed)
    }

    pub async fn connection_count(&self) -> usize {
        self.state.read().await.connections.len()
    }

    pub async fn subscription_count(&self, topic: &str) -> usize {
        self.state
            .read()
            .await
            .topics
            .get(topic)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

/// Notification names, or `*` for all of them
fn is_valid_topic(topic: &str) -> bool {
    topic == ALL_TOPICS || NotificationKind::from_name(topic).is_some()
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Notification;
    use serde_json::json;
    use std::time::Duration;

    fn report_event() -> WsEvent {
        WsEvent::notification(&Notification::report_data_updated(json!({"success": true})))
    }

    #[test]
    fn test_valid_topics() {
        assert!(is_valid_topic("report-data-updated"));
        assert!(is_valid_topic("order-created"));
        assert!(is_valid_topic("*"));

        assert!(!is_valid_topic("metrics.mood"));
        assert!(!is_valid_topic(""));
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = hub.register(tx).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(hub.connection_count().await, 1);

        hub.unregister(&id).await;
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_subscribe_unsubscribe() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        let subscribed = hub
            .subscribe(&id, vec!["order-created".to_string(), "bogus".to_string()])
            .await
            .unwrap();
        assert_eq!(subscribed, vec!["order-created"]);
        assert_eq!(hub.subscription_count("order-created").await, 1);

        let unsubscribed = hub
            .unsubscribe(&id, vec!["order-created".to_string()])
            .await
            .unwrap();
        assert_eq!(unsubscribed, vec!["order-created"]);
        assert_eq!(hub.subscription_count("order-created").await, 0);
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let hub = ConnectionHub::new(HubConfig { max_connections: 1 });
        let (tx1, _) = mpsc::unbounded_channel();
        let (tx2, _) = mpsc::unbounded_channel();

        hub.register(tx1).await.unwrap();
        let result = hub.register(tx2).await;
        assert!(matches!(result, Err(HubError::TooManyConnections(1))));
    }

    #[tokio::test]
    async fn test_broadcast_only_to_subscribers() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let id1 = hub.register(tx1).await.unwrap();
        let id2 = hub.register(tx2).await.unwrap();

        hub.subscribe(&id1, vec!["report-data-updated".to_string()]).await.unwrap();
        hub.subscribe(&id2, vec!["order-created".to_string()]).await.unwrap();

        assert_eq!(hub.broadcast(&report_event()).await, 1);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_wildcard_gets_one_copy() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        hub.subscribe(&id, vec!["*".to_string(), "report-data-updated".to_string()])
            .await
            .unwrap();

        assert_eq!(hub.broadcast(&report_event()).await, 1);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_relay_from_bus() {
        let hub = Arc::new(ConnectionHub::new(HubConfig::default()));
        let bus = EventBus::new();
        let _relay = hub.relay_from(&bus);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        hub.subscribe(&id, vec!["*".to_string()]).await.unwrap();

        bus.publish(Notification::order_created(json!({"success": true, "data": {"id": 9}})));

        let msg = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match msg {
            ServerMessage::Notification { name, payload } => {
                assert_eq!(name, "order-created");
                assert_eq!(payload["data"]["id"], 9);
            }
            other => panic!("Expected Notification, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_broadcast_during_resubscribe_does_not_stall() {
        let hub = Arc::new(ConnectionHub::new(HubConfig::default()));
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        let broadcaster = {
            let hub = Arc::clone(&hub);
            tokio::spawn(async move {
                for _ in 0..2000 {
                    hub.broadcast(&report_event()).await;
                }
            })
        };
        let subscriber = {
            let hub = Arc::clone(&hub);
            let id = id.clone();
            tokio::spawn(async move {
                for _ in 0..2000 {
                    hub.subscribe(&id, vec!["report-data-updated".to_string()]).await.unwrap();
                    hub.unsubscribe(&id, vec!["report-data-updated".to_string()]).await.unwrap();
                }
            })
        };

        tokio::time::timeout(Duration::from_secs(20), async {
            broadcaster.await.unwrap();
            subscriber.await.unwrap();
        })
        .await
        .expect("hub stalled while broadcasting and resubscribing");

        hub.unregister(&id).await;
        assert_eq!(hub.connection_count().await, 0);
        assert_eq!(hub.subscription_count("report-data-updated").await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_relay_keeps_publish_order() {
        let hub = Arc::new(ConnectionHub::new(HubConfig::default()));
        let bus = EventBus::new();
        let _relay = hub.relay_from(&bus);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        hub.subscribe(&id, vec!["report-data-updated".to_string()]).await.unwrap();

        for seq in 0..50 {
            bus.publish(Notification::report_data_updated(json!({"success": true, "seq": seq})));
        }

        for expected in 0..50 {
            let msg = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .unwrap()
                .unwrap();
            match msg {
                ServerMessage::Notification { payload, .. } => assert_eq!(payload["seq"], expected),
                other => panic!("Expected Notification, got {:?}", other),
            }
        }
    }
}
