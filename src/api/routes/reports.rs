//! Report Routes
//!
//! - POST /api/sales/generate-report - Generate a sales report

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use super::Passthrough;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::upstream::ReportRequest;

/// POST /api/sales/generate-report
///
/// Accepts `{query}`, `{startDate, endDate}` or both. The forwarded call
/// goes through the fetch slot, so every dashboard is told about the
/// result, whoever asked for it.
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> ApiResult<Passthrough> {
    let Json(request) = payload?;
    let request = request.normalize();

    tracing::info!(
        query = %request.query,
        start = ?request.start_date,
        end = ?request.end_date,
        "Generating report"
    );

    let response = state.sales.generate_report(&request).await?;
    Ok(Passthrough(response))
}
