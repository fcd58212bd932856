//! # SalesDesk
//!
//! Gateway for a sales-management dashboard with an embedded chat agent.
//! The gateway fronts a remote sales API (orders, reports, fulfillment) and
//! tells every open dashboard when a report or order comes back, no matter
//! whether the dashboard itself or the chat agent asked for it.
//!
//! ## Modules
//!
//! - [`intercept`]: The process-wide fetch slot and the interceptor that
//!   observes watched calls
//! - [`events`]: Typed publish/subscribe bus for notifications
//! - [`upstream`]: Sales API payloads and client
//! - [`widget`]: Chat widget configuration and per-route agents
//! - [`websocket`]: Relay of notifications to dashboards
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use salesdesk::{AppState, Config, HttpTransport};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let transport = HttpTransport::new(config.upstream.timeout())?;
//!
//!     // Installs the interceptor and starts the WebSocket relay
//!     let state = AppState::new(&config, Arc::new(transport));
//!
//!     let _report = state.bus.subscribe(
//!         salesdesk::NotificationKind::ReportDataUpdated,
//!         |n| println!("report: {}", n.payload()),
//!     );
//!
//!     salesdesk::serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod events;
pub mod intercept;
pub mod upstream;
pub mod websocket;
pub mod widget;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{generate_default_config, ApiConfig, Config, ConfigError, LoggingConfig};

pub use events::{EventBus, Notification, NotificationKind, Subscription};

pub use intercept::{
    FetchSlot, HttpTransport, InboundResponse, InterceptingTransport, OutboundRequest, Transport,
    TransportError, WatchRule,
};

pub use upstream::{
    CreateOrder, InvoiceRequest, PendingOrder, ReportRequest, SalesApiClient, SalesApiConfig,
    UpstreamError,
};

pub use websocket::{ClientMessage, ConnectionHub, HubConfig, HubError, ServerMessage, WsEvent};

pub use widget::{AgentIdentity, WidgetConfig, WidgetSettings};
