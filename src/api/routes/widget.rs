//! Widget Routes
//!
//! - GET /api/widget/config?route=/reports - Chat widget configuration

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{WidgetConfigQuery, WidgetConfigResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /api/widget/config
///
/// Picks the agent for the dashboard route the widget is mounted on.
pub async fn widget_config(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WidgetConfigQuery>, QueryRejection>,
) -> ApiResult<Json<WidgetConfigResponse>> {
    let Query(query) = query?;
    let config = state.widget.config_for(&query.route);

    tracing::debug!(
        route = %query.route,
        agent_id = %config.chat_options.agent_id,
        "Resolved widget agent"
    );

    Ok(Json(WidgetConfigResponse {
        route: query.route,
        config,
        loader_url: state.widget.loader_url(),
        injection_delay_ms: state.widget.injection_delay_ms,
    }))
}
