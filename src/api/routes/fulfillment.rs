//! Fulfillment Routes
//!
//! - GET /api/fulfillment/pending - Orders awaiting an invoice
//! - POST /api/fulfillment/process - Generate an invoice for an order

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use super::Passthrough;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::upstream::InvoiceRequest;

/// GET /api/fulfillment/pending
pub async fn pending(State(state): State<Arc<AppState>>) -> ApiResult<Passthrough> {
    let response = state.sales.pending_fulfillment().await?;
    Ok(Passthrough(response))
}

/// POST /api/fulfillment/process
pub async fn process(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InvoiceRequest>, JsonRejection>,
) -> ApiResult<Passthrough> {
    let Json(invoice) = payload?;
    let invoice = invoice.validate()?;

    tracing::info!(sales_id = invoice.sales_id, amount = invoice.amount, "Processing invoice");

    let response = state.sales.process_invoice(&invoice).await?;
    Ok(Passthrough(response))
}
