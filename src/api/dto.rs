//! Data Transfer Objects
//!
//! Gateway-specific request and response types. Bodies forwarded to the
//! sales API use the types in [`crate::upstream`] directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::widget::WidgetConfig;

// ============================================
// WIDGET DTOs
// ============================================

/// Query for `GET /api/widget/config`
#[derive(Debug, Deserialize)]
pub struct WidgetConfigQuery {
    /// Dashboard route the widget is mounted on
    #[serde(default = "default_route")]
    pub route: String,
}

fn default_route() -> String {
    "/".to_string()
}

/// Widget configuration for one route
#[derive(Debug, Serialize, Deserialize)]
pub struct WidgetConfigResponse {
    pub route: String,
    /// Written to `window.wxOConfiguration`
    pub config: WidgetConfig,
    /// Loader script to inject
    pub loader_url: String,
    /// Delay between writing the config and injecting the loader
    pub injection_delay_ms: u32,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "installed" once the fetch slot is wrapped
    pub interceptor: String,
    /// Sales API base URL
    pub upstream: String,
    /// Open dashboard connections
    pub connections: usize,
    /// Bus subscribers per notification name
    pub subscribers: BTreeMap<String, usize>,
    pub uptime_seconds: u64,
    pub version: String,
}
