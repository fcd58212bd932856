//! Intercepting Transport
//!
//! Wraps another transport and publishes a notification for every response
//! to a watched URL.

use async_trait::async_trait;
use axum::body::Bytes;
use std::sync::Arc;

use super::transport::{InboundResponse, OutboundRequest, Transport, TransportError};
use crate::events::{EventBus, Notification, NotificationKind};

/// Report-generation path watched by default
pub const REPORT_PATTERN: &str = "/api/sales/generate-report";
/// Order-creation path watched by default
pub const ORDER_PATTERN: &str = "/api/orders/create";

/// A URL substring and the notification it produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRule {
    pattern: String,
    kind: NotificationKind,
}

impl WatchRule {
    pub fn new(pattern: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Substring match, not exact path
    pub fn matches(&self, url: &str) -> bool {
        !self.pattern.is_empty() && url.contains(&self.pattern)
    }
}

/// The two rules the dashboard relies on
pub fn default_rules() -> Vec<WatchRule> {
    vec![
        WatchRule::new(REPORT_PATTERN, NotificationKind::ReportDataUpdated),
        WatchRule::new(ORDER_PATTERN, NotificationKind::OrderCreated),
    ]
}

/// Transport wrapper that observes watched calls
pub struct InterceptingTransport {
    inner: Arc<dyn Transport>,
    rules: Vec<WatchRule>,
    bus: EventBus,
}

impl InterceptingTransport {
    pub fn new(inner: Arc<dyn Transport>, rules: Vec<WatchRule>, bus: EventBus) -> Self {
        Self { inner, rules, bus }
    }

    pub fn rules(&self) -> &[WatchRule] {
        &self.rules
    }

    /// First rule whose pattern occurs in the URL
    fn watched_kind(&self, url: &str) -> Option<NotificationKind> {
        self.rules.iter().find(|r| r.matches(url)).map(|r| r.kind)
    }
}

#[async_trait]
impl Transport for InterceptingTransport {
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, TransportError> {
        let Some(kind) = self.watched_kind(&request.url) else {
            return self.inner.send(request).await;
        };

        let url = request.url.clone();
        tracing::debug!(url = %url, notification = %kind, "Intercepted request");

        let response = self.inner.send(request).await?;

        // The caller keeps the original body; parsing works on a duplicate
        let duplicate = response.body().clone();
        let bus = self.bus.clone();
        tokio::spawn(async move {
            publish_parsed(&bus, kind, &url, duplicate);
        });

        Ok(response)
    }
}

fn publish_parsed(bus: &EventBus, kind: NotificationKind, url: &str, body: Bytes) {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(payload) => {
            let handlers = bus.publish(Notification::new(kind, payload));
            tracing::info!(
                notification = %kind,
                url = %url,
                handlers,
                "Dispatched intercepted response"
            );
        }
        Err(e) => {
            tracing::warn!(
                notification = %kind,
                url = %url,
                error = %e,
                "Intercepted response is not JSON, no notification sent"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intercept::testing::StubTransport;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn intercepting(stub: Arc<StubTransport>, bus: &EventBus) -> InterceptingTransport {
        InterceptingTransport::new(stub, default_rules(), bus.clone())
    }

    fn collect(bus: &EventBus, kind: NotificationKind) -> (crate::events::Subscription, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sub = bus.subscribe(kind, move |n| {
            let _ = tx.send(n.clone());
        });
        (sub, rx)
    }

    #[test]
    fn test_rule_matches_substring() {
        let rule = WatchRule::new(REPORT_PATTERN, NotificationKind::ReportDataUpdated);
        assert!(rule.matches("https://sales.example.com/api/sales/generate-report"));
        assert!(rule.matches("http://localhost:8082/api/sales/generate-report?debug=1"));
        assert!(!rule.matches("https://sales.example.com/api/fulfillment/pending"));
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let rule = WatchRule::new("", NotificationKind::OrderCreated);
        assert!(!rule.matches("https://anything"));
    }

    #[tokio::test]
    async fn test_matching_call_publishes_once_and_body_stays_intact() {
        let bus = EventBus::new();
        let (_sub, mut rx) = collect(&bus, NotificationKind::ReportDataUpdated);
        let report = json!({"success": true, "summary": {"totalOrders": 3}});
        let stub = Arc::new(StubTransport::new().respond(REPORT_PATTERN, 200, report.clone()));

        let transport = intercepting(Arc::clone(&stub), &bus);
        let request = OutboundRequest::post_json(
            "https://sales.example.com/api/sales/generate-report",
            &json!({"query": "All sales data"}),
        )
        .unwrap();
        let response = transport.send(request).await.unwrap();

        assert_eq!(response.decode::<serde_json::Value>().unwrap(), report);

        let notification = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("notification not published")
            .unwrap();
        assert_eq!(notification.kind(), NotificationKind::ReportDataUpdated);
        assert_eq!(notification.payload(), &report);

        // Exactly one
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_order_call_publishes_order_created() {
        let bus = EventBus::new();
        let (_sub, mut rx) = collect(&bus, NotificationKind::OrderCreated);
        let stub = Arc::new(StubTransport::new().respond(ORDER_PATTERN, 201, json!({"success": true, "data": {"id": 12}})));

        let transport = intercepting(stub, &bus);
        let request = OutboundRequest::post_json(
            "https://orders.example.com/api/orders/create",
            &json!({"customer": "Acme"}),
        )
        .unwrap();
        transport.send(request).await.unwrap();

        let notification = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(notification.payload()["data"]["id"], 12);
    }

    #[tokio::test]
    async fn test_non_matching_call_is_transparent() {
        let bus = EventBus::new();
        let (_report_sub, mut report_rx) = collect(&bus, NotificationKind::ReportDataUpdated);
        let (_order_sub, mut order_rx) = collect(&bus, NotificationKind::OrderCreated);
        let pending = json!({"success": true, "data": []});
        let stub = Arc::new(StubTransport::new().respond("/api/fulfillment/pending", 200, pending.clone()));

        let direct = stub
            .send(OutboundRequest::get("https://sales.example.com/api/fulfillment/pending"))
            .await
            .unwrap();

        let transport = intercepting(Arc::clone(&stub), &bus);
        let wrapped = transport
            .send(OutboundRequest::get("https://sales.example.com/api/fulfillment/pending"))
            .await
            .unwrap();

        assert_eq!(direct, wrapped);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(report_rx.try_recv().is_err());
        assert!(order_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unparseable_body_is_swallowed() {
        let bus = EventBus::new();
        let (_sub, mut rx) = collect(&bus, NotificationKind::ReportDataUpdated);
        let stub = Arc::new(StubTransport::new().respond_raw(
            REPORT_PATTERN,
            502,
            "<html>Bad Gateway</html>",
        ));

        let transport = intercepting(stub, &bus);
        let response = transport
            .send(OutboundRequest::get("https://sales.example.com/api/sales/generate-report"))
            .await
            .unwrap();

        assert_eq!(response.status, 502);
        assert_eq!(response.text(), "<html>Bad Gateway</html>");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_transport_error_propagates_without_notification() {
        let bus = EventBus::new();
        let (_sub, mut rx) = collect(&bus, NotificationKind::OrderCreated);
        let stub = Arc::new(StubTransport::new());

        let transport = intercepting(stub, &bus);
        let result = transport
            .send(OutboundRequest::get("https://orders.example.com/api/orders/create"))
            .await;

        assert!(matches!(result, Err(TransportError::Unavailable(_))));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
