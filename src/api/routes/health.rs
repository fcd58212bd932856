//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::events::NotificationKind;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Ready once outbound calls are intercepted and relayed. The remote
/// sales API is not probed.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.slot.is_intercepted() && state.is_relaying() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let intercepted = state.slot.is_intercepted();

    let subscribers = NotificationKind::all()
        .into_iter()
        .map(|kind| (kind.name().to_string(), state.bus.subscriber_count(kind)))
        .collect();

    Json(HealthResponse {
        status: if intercepted { "healthy" } else { "degraded" }.to_string(),
        interceptor: if intercepted { "installed" } else { "missing" }.to_string(),
        upstream: state.sales.config().sales_base_url.clone(),
        connections: state.ws_connection_count().await,
        subscribers,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
