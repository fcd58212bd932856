//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{ApiConfig, Config};
use crate::events::{EventBus, Subscription};
use crate::intercept::{FetchSlot, Transport};
use crate::upstream::SalesApiClient;
use crate::websocket::{ConnectionHub, HubConfig};
use crate::widget::WidgetSettings;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// The process-wide fetch capability
    pub slot: Arc<FetchSlot>,
    /// Notifications produced by intercepted calls
    pub bus: EventBus,
    /// Client for the remote sales API, sending through `slot`
    pub sales: Arc<SalesApiClient>,
    /// Chat widget deployment and per-route agents
    pub widget: Arc<WidgetSettings>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// WebSocket connection hub for notification relay
    pub ws_hub: Arc<ConnectionHub>,
    /// Keeps the hub subscribed to the bus
    relay: Arc<Vec<Subscription>>,
}

impl AppState {
    /// Wire the gateway around a transport
    ///
    /// Installs the interceptor on a fresh fetch slot and starts relaying
    /// notifications to WebSocket clients.
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self::with_ws_config(config, transport, HubConfig::default())
    }

    /// Create AppState with custom WebSocket hub configuration
    pub fn with_ws_config(config: &Config, transport: Arc<dyn Transport>, hub_config: HubConfig) -> Self {
        let bus = EventBus::new();
        let slot = Arc::new(FetchSlot::from_arc(transport));
        slot.install_interceptor(config.intercept.rules(), bus.clone());

        let ws_hub = Arc::new(ConnectionHub::new(hub_config));
        let relay = ws_hub.relay_from(&bus);

        let sales = SalesApiClient::new(Arc::clone(&slot), config.upstream.client_config());

        Self {
            slot,
            bus,
            sales: Arc::new(sales),
            widget: Arc::new(config.widget.clone()),
            config: Arc::new(config.api.clone()),
            start_time: Instant::now(),
            ws_hub,
            relay: Arc::new(relay),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Whether notifications reach the WebSocket hub
    pub fn is_relaying(&self) -> bool {
        !self.relay.is_empty()
    }

    /// Get WebSocket connection count
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }
}
