//! Sales API Client
//!
//! Calls the remote sales API through the gateway's [`FetchSlot`], so every
//! call is visible to the interception layer.

use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::types::{CreateOrder, InvoiceRequest, ReportRequest};
use crate::intercept::{FetchSlot, InboundResponse, OutboundRequest, TransportError};

pub const CREATE_ORDER_PATH: &str = "/api/orders/create";
pub const GENERATE_REPORT_PATH: &str = "/api/sales/generate-report";
pub const PENDING_FULFILLMENT_PATH: &str = "/api/fulfillment/pending";
pub const PROCESS_FULFILLMENT_PATH: &str = "/api/fulfillment/process";

/// Client for the remote sales API
pub struct SalesApiClient {
    slot: Arc<FetchSlot>,
    config: SalesApiConfig,
}

/// Where the sales API lives
#[derive(Debug, Clone)]
pub struct SalesApiConfig {
    /// Base URL for reports and fulfillment
    pub sales_base_url: String,
    /// Base URL for order creation (some deployments host it separately)
    pub orders_base_url: String,
    /// Forward the optional contact number on new orders
    pub send_contact_number: bool,
    /// Extra headers sent on order-creation calls
    pub order_headers: BTreeMap<String, String>,
}

impl Default for SalesApiConfig {
    fn default() -> Self {
        Self {
            sales_base_url: "http://localhost:3000".to_string(),
            orders_base_url: "http://localhost:3000".to_string(),
            send_contact_number: true,
            order_headers: BTreeMap::new(),
        }
    }
}

impl SalesApiConfig {
    /// Both endpoints on one base URL
    pub fn single(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            sales_base_url: base_url.clone(),
            orders_base_url: base_url,
            ..Default::default()
        }
    }
}

impl SalesApiClient {
    pub fn new(slot: Arc<FetchSlot>, config: SalesApiConfig) -> Self {
        Self { slot, config }
    }

    pub fn config(&self) -> &SalesApiConfig {
        &self.config
    }

    /// POST /api/orders/create
    pub async fn create_order(&self, order: &CreateOrder) -> Result<InboundResponse, UpstreamError> {
        let mut order = order.clone();
        if !self.config.send_contact_number {
            order.contact_number = None;
        }

        let url = join(&self.config.orders_base_url, CREATE_ORDER_PATH);
        let mut request = OutboundRequest::post_json(url, &order)?;
        for (name, value) in &self.config.order_headers {
            request = request.header(name, value);
        }

        self.send(request).await
    }

    /// POST /api/sales/generate-report
    pub async fn generate_report(&self, report: &ReportRequest) -> Result<InboundResponse, UpstreamError> {
        let url = join(&self.config.sales_base_url, GENERATE_REPORT_PATH);
        self.send(OutboundRequest::post_json(url, report)?).await
    }

    /// GET /api/fulfillment/pending
    pub async fn pending_fulfillment(&self) -> Result<InboundResponse, UpstreamError> {
        let url = join(&self.config.sales_base_url, PENDING_FULFILLMENT_PATH);
        self.send(OutboundRequest::get(url)).await
    }

    /// POST /api/fulfillment/process
    pub async fn process_invoice(&self, invoice: &InvoiceRequest) -> Result<InboundResponse, UpstreamError> {
        let url = join(&self.config.sales_base_url, PROCESS_FULFILLMENT_PATH);
        self.send(OutboundRequest::post_json(url, invoice)?).await
    }

    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, UpstreamError> {
        let url = request.url.clone();
        let response = self.slot.fetch(request).await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Sales API call failed");
            UpstreamError::from(e)
        })?;

        if !response.is_success() {
            tracing::debug!(url = %url, status = response.status, "Sales API returned non-success status");
        }
        Ok(response)
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Errors from talking to the sales API
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Sales API unavailable: {0}")]
    Unavailable(String),

    #[error("Sales API timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),
}

impl From<TransportError> for UpstreamError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout => UpstreamError::Timeout,
            TransportError::Unavailable(msg) => UpstreamError::Unavailable(msg),
            TransportError::Request(msg) | TransportError::InvalidRequest(msg) => {
                UpstreamError::Request(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intercept::testing::StubTransport;
    use crate::intercept::Method;
    use serde_json::json;

    fn client_with(stub: Arc<StubTransport>, config: SalesApiConfig) -> SalesApiClient {
        SalesApiClient::new(Arc::new(FetchSlot::from_arc(stub)), config)
    }

    fn acme_order() -> CreateOrder {
        CreateOrder {
            customer: "Acme".to_string(),
            product: "Widget".to_string(),
            quantity: 5,
            tentative_delivery_date: None,
            contact_number: Some("555-0100".to_string()),
        }
    }

    #[test]
    fn test_join_trims_trailing_slash() {
        assert_eq!(
            join("https://api.example.com/", GENERATE_REPORT_PATH),
            "https://api.example.com/api/sales/generate-report"
        );
    }

    #[tokio::test]
    async fn test_create_order_uses_orders_base_and_headers() {
        let stub = Arc::new(StubTransport::new().respond(CREATE_ORDER_PATH, 200, json!({"success": true})));
        let mut config = SalesApiConfig {
            sales_base_url: "https://sales.example.com".to_string(),
            orders_base_url: "https://orders.example.com".to_string(),
            ..Default::default()
        };
        config
            .order_headers
            .insert("ngrok-skip-browser-warning".to_string(), "true".to_string());

        let client = client_with(Arc::clone(&stub), config);
        client.create_order(&acme_order()).await.unwrap();

        let calls = stub.calls();
        assert_eq!(calls[0].method, Method::Post);
        assert_eq!(calls[0].url, "https://orders.example.com/api/orders/create");
        assert!(calls[0]
            .headers
            .iter()
            .any(|(k, v)| k == "ngrok-skip-browser-warning" && v == "true"));
        assert_eq!(stub.last_body().unwrap()["quantity"], 5);
        assert_eq!(stub.last_body().unwrap()["contactNumber"], "555-0100");
    }

    #[tokio::test]
    async fn test_contact_number_dropped_when_disabled() {
        let stub = Arc::new(StubTransport::new().respond(CREATE_ORDER_PATH, 200, json!({"success": true})));
        let config = SalesApiConfig {
            send_contact_number: false,
            ..SalesApiConfig::single("https://sales.example.com")
        };

        let client = client_with(Arc::clone(&stub), config);
        client.create_order(&acme_order()).await.unwrap();

        assert!(stub.last_body().unwrap().get("contactNumber").is_none());
    }

    #[tokio::test]
    async fn test_generate_report_body() {
        let stub = Arc::new(StubTransport::new().respond(GENERATE_REPORT_PATH, 200, json!({"success": true})));
        let client = client_with(Arc::clone(&stub), SalesApiConfig::single("https://sales.example.com"));

        client
            .generate_report(&ReportRequest::for_range("2024-01-01", "2024-01-31"))
            .await
            .unwrap();

        assert_eq!(
            stub.last_body().unwrap(),
            json!({
                "query": "Sales report from 2024-01-01 to 2024-01-31",
                "startDate": "2024-01-01",
                "endDate": "2024-01-31"
            })
        );
    }

    #[tokio::test]
    async fn test_pending_is_get() {
        let stub = Arc::new(StubTransport::new().respond(PENDING_FULFILLMENT_PATH, 200, json!({"success": true, "data": []})));
        let client = client_with(Arc::clone(&stub), SalesApiConfig::single("https://sales.example.com"));

        let response = client.pending_fulfillment().await.unwrap();
        assert!(response.is_success());
        assert_eq!(stub.calls()[0].method, Method::Get);
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_unavailable() {
        let stub = Arc::new(StubTransport::new());
        let client = client_with(stub, SalesApiConfig::default());

        let result = client.pending_fulfillment().await;
        assert!(matches!(result, Err(UpstreamError::Unavailable(_))));
    }

    #[test]
    fn test_every_transport_error_has_an_upstream_variant() {
        assert!(matches!(UpstreamError::from(TransportError::Timeout), UpstreamError::Timeout));
        assert!(matches!(
            UpstreamError::from(TransportError::InvalidRequest("bad url".into())),
            UpstreamError::Request(_)
        ));
        assert!(matches!(
            UpstreamError::from(TransportError::Request("reset".into())),
            UpstreamError::Request(_)
        ));
    }
}
