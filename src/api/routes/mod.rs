//! API Routes
//!
//! Route handlers organized by functionality.

pub mod fulfillment;
pub mod health;
pub mod orders;
pub mod reports;
pub mod widget;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::intercept::InboundResponse;

/// An upstream response returned to the caller unchanged
pub struct Passthrough(pub InboundResponse);

impl IntoResponse for Passthrough {
    fn into_response(self) -> Response {
        let response = self.0;
        let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = response
            .content_type
            .as_deref()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
            .unwrap_or(HeaderValue::from_static("application/json"));

        (status, [(header::CONTENT_TYPE, content_type)], response.into_body()).into_response()
    }
}
