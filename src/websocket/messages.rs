//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between
//! dashboards and the gateway.

use serde::{Deserialize, Serialize};

use crate::events::Notification;

/// Topic matching every notification
pub const ALL_TOPICS: &str = "*";

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to notification names (or `*`)
    Subscribe { topics: Vec<String> },
    /// Unsubscribe from notification names
    Unsubscribe { topics: Vec<String> },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A notification was published on the gateway's event bus
    Notification {
        /// Notification name, e.g. `report-data-updated`
        name: String,
        /// Parsed response body that triggered it
        payload: serde_json::Value,
    },
    /// Subscription confirmed
    Subscribed { topics: Vec<String> },
    /// Unsubscription confirmed
    Unsubscribed { topics: Vec<String> },
    /// Pong response to ping
    Pong,
    /// Error message
    Error { message: String },
    /// Connection established
    Connected { connection_id: String },
}

impl ServerMessage {
    /// Serialize to a text frame
    pub fn to_text(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize message");
                None
            }
        }
    }
}

/// Internal event for broadcasting through the hub
#[derive(Debug, Clone)]
pub struct WsEvent {
    /// Topic this event belongs to (the notification name)
    pub topic: String,
    /// The message to send to subscribers
    pub message: ServerMessage,
}

impl WsEvent {
    pub fn notification(notification: &Notification) -> Self {
        Self {
            topic: notification.name().to_string(),
            message: ServerMessage::Notification {
                name: notification.name().to_string(),
                payload: notification.payload().clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_message_deserialize_subscribe() {
        let json = r#"{"type": "subscribe", "topics": ["report-data-updated", "*"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { topics } => {
                assert_eq!(topics, vec!["report-data-updated", "*"]);
            }
            _ => panic!("Expected Subscribe"),
        }
    }

    #[test]
    fn test_client_message_deserialize_ping() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_notification_event() {
        let event = WsEvent::notification(&Notification::report_data_updated(json!({
            "success": true,
            "data": {"summary": {"totalOrders": 3}}
        })));
        assert_eq!(event.topic, "report-data-updated");

        let value: serde_json::Value =
            serde_json::from_str(&event.message.to_text().unwrap()).unwrap();
        assert_eq!(value["type"], "notification");
        assert_eq!(value["name"], "report-data-updated");
        assert_eq!(value["payload"]["data"]["summary"]["totalOrders"], 3);
    }

    #[test]
    fn test_server_message_serialize_connected() {
        let msg = ServerMessage::Connected {
            connection_id: "abc-123".to_string(),
        };
        let json = msg.to_text().unwrap();
        assert!(json.contains("\"type\":\"connected\""));
        assert!(json.contains("\"connection_id\":\"abc-123\""));
    }
}
