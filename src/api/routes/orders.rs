//! Order Routes
//!
//! - POST /api/orders/create - Create an order on the sales API

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use super::Passthrough;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::upstream::CreateOrder;

/// POST /api/orders/create
///
/// Checks required fields, then forwards the order. The sales API's
/// answer, including `success: false`, is returned as is.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateOrder>, JsonRejection>,
) -> ApiResult<Passthrough> {
    let Json(order) = payload?;
    let order = order.validate()?;

    tracing::info!(
        customer = %order.customer,
        product = %order.product,
        quantity = order.quantity,
        "Creating order"
    );

    let response = state.sales.create_order(&order).await?;
    Ok(Passthrough(response))
}
