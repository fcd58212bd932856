//! HTTP API Client
//!
//! Functions for communicating with the SalesDesk gateway. Every sales call
//! answers with `{success, data|error}`; failures come back as the text to
//! show in an error toast.

use gloo_net::http::{Request, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default gateway URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8082";

const API_BASE_KEY: &str = "salesdesk_gateway_url";

/// Get the gateway URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

// ============ Request Types ============

/// Body of `POST /api/orders/create`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer: String,
    pub product: String,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tentative_delivery_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
}

/// Body of `POST /api/sales/generate-report`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl ReportRequest {
    pub fn for_range(start: &str, end: &str) -> Self {
        Self {
            query: format!("Sales report from {} to {}", start, end),
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
        }
    }

    pub fn all_time() -> Self {
        Self {
            query: "All sales data".to_string(),
            start_date: None,
            end_date: None,
        }
    }

    /// Range form when both dates are set, all-time otherwise
    pub fn from_inputs(start: &str, end: &str) -> Self {
        if start.is_empty() || end.is_empty() {
            Self::all_time()
        } else {
            Self::for_range(start, end)
        }
    }
}

/// Body of `POST /api/fulfillment/process`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub sales_id: i64,
    pub amount: f64,
}

// ============ Response Types ============

/// An order waiting for an invoice
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PendingOrder {
    pub id: i64,
    pub customer: String,
    pub product: String,
    pub quantity: i64,
    #[serde(default)]
    pub requested_date: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
}

/// A generated sales report
///
/// Same shape whether the dashboard asked for it or the chat agent did.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    #[serde(default)]
    pub summary: Option<ReportSummary>,
    #[serde(default)]
    pub data: Option<ReportSeries>,
    #[serde(default)]
    pub date_range: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSummary {
    pub total_orders: f64,
    pub total_quantity: f64,
    pub delivery_rate: f64,
    pub top_product: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSeries {
    pub monthly_trend: Vec<TrendPoint>,
    pub top_customers: Vec<NamedQuantity>,
    pub top_products: Vec<NamedQuantity>,
    pub delivery_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrendPoint {
    pub month: String,
    pub quantity: f64,
    pub delivered: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NamedQuantity {
    pub name: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusCount {
    pub name: String,
    pub value: f64,
}

impl ReportData {
    /// At least one order in the period
    pub fn has_data(&self) -> bool {
        self.summary
            .as_ref()
            .map(|s| s.total_orders > 0.0)
            .unwrap_or(false)
    }

    pub fn series(&self) -> ReportSeries {
        self.data.clone().unwrap_or_default()
    }

    /// Share of all orders, in percent
    pub fn percent_of_orders(&self, value: f64) -> f64 {
        match &self.summary {
            Some(summary) if summary.total_orders > 0.0 => value / summary.total_orders * 100.0,
            _ => 0.0,
        }
    }
}

/// Chat widget settings for one route
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WidgetConfigResponse {
    pub route: String,
    /// Written verbatim to `window.wxOConfiguration`
    pub config: Value,
    pub loader_url: String,
    pub injection_delay_ms: u32,
}

// ============ API Functions ============

/// Create an order
pub async fn create_order(order: &CreateOrderRequest) -> Result<Value, String> {
    let response = Request::post(&format!("{}/api/orders/create", get_api_base()))
        .json(order)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    let body = read_envelope(response).await?;
    Ok(body.get("data").cloned().unwrap_or(Value::Null))
}

/// Generate a sales report
pub async fn generate_report(request: &ReportRequest) -> Result<ReportData, String> {
    let response = Request::post(&format!("{}/api/sales/generate-report", get_api_base()))
        .json(request)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    let body = read_envelope(response).await?;
    serde_json::from_value(body).map_err(|e| format!("Parse error: {}", e))
}

/// Fetch orders waiting for an invoice
pub async fn fetch_pending() -> Result<Vec<PendingOrder>, String> {
    let response = Request::get(&format!("{}/api/fulfillment/pending", get_api_base()))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    let body = read_envelope(response).await?;
    match body.get("data") {
        Some(data) if !data.is_null() => {
            serde_json::from_value(data.clone()).map_err(|e| format!("Parse error: {}", e))
        }
        _ => Ok(Vec::new()),
    }
}

/// Generate an invoice for a pending order
pub async fn process_invoice(invoice: &InvoiceRequest) -> Result<(), String> {
    let response = Request::post(&format!("{}/api/fulfillment/process", get_api_base()))
        .json(invoice)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_envelope(response).await.map(|_| ())
}

/// Fetch the chat widget configuration for a route
pub async fn fetch_widget_config(route: &str) -> Result<WidgetConfigResponse, String> {
    let response = Request::get(&format!("{}/api/widget/config", get_api_base()))
        .query([("route", route)])
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        return Err(error_message(status, &body));
    }

    response.json().await.map_err(|e| format!("Parse error: {}", e))
}

async fn read_envelope(response: Response) -> Result<Value, String> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|_| format!("Gateway returned {} with an unreadable body", status))?;
    envelope_result(status, body)
}

/// Accept `{success: true, ..}`, turn anything else into toast text
pub fn envelope_result(status: u16, body: Value) -> Result<Value, String> {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        Ok(body)
    } else {
        Err(error_message(status, &body))
    }
}

/// Message from a sales API envelope or a gateway error body
fn error_message(status: u16, body: &Value) -> String {
    let error = &body["error"];
    if let Some(message) = error.as_str() {
        return message.to_string();
    }
    if let Some(message) = error["message"].as_str() {
        return message.to_string();
    }
    format!("Request failed ({})", status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_request_for_range() {
        let body = serde_json::to_value(ReportRequest::for_range("2024-01-01", "2024-01-31")).unwrap();
        assert_eq!(
            body,
            json!({
                "query": "Sales report from 2024-01-01 to 2024-01-31",
                "startDate": "2024-01-01",
                "endDate": "2024-01-31"
            })
        );
    }

    #[test]
    fn test_report_request_from_inputs() {
        assert_eq!(ReportRequest::from_inputs("2024-01-01", ""), ReportRequest::all_time());
        let body = serde_json::to_value(ReportRequest::all_time()).unwrap();
        assert_eq!(body, json!({"query": "All sales data"}));
    }

    #[test]
    fn test_envelope_result() {
        let ok = envelope_result(200, json!({"success": true, "data": [1]})).unwrap();
        assert_eq!(ok["data"], json!([1]));

        let failed = envelope_result(200, json!({"success": false, "error": "Out of stock"}));
        assert_eq!(failed.unwrap_err(), "Out of stock");

        let gateway = envelope_result(
            502,
            json!({"error": {"code": "UPSTREAM_ERROR", "message": "Sales API unreachable"}}),
        );
        assert_eq!(gateway.unwrap_err(), "Sales API unreachable");

        assert_eq!(envelope_result(500, json!({})).unwrap_err(), "Request failed (500)");
    }

    #[test]
    fn test_report_data_has_data() {
        let report: ReportData = serde_json::from_value(json!({
            "success": true,
            "dateRange": "2024-01-01 to 2024-01-31",
            "summary": {"totalOrders": 4, "totalQuantity": 20, "deliveryRate": 50.0, "topProduct": "Widget"},
            "data": {
                "topCustomers": [{"name": "Acme", "quantity": 12}],
                "deliveryStatus": [{"name": "Delivered", "value": 2}, {"name": "Pending", "value": 2}]
            }
        }))
        .unwrap();

        assert!(report.has_data());
        assert_eq!(report.series().top_customers[0].name, "Acme");
        assert!(report.series().monthly_trend.is_empty());
        assert_eq!(report.percent_of_orders(1.0), 25.0);

        let empty: ReportData =
            serde_json::from_value(json!({"summary": {"totalOrders": 0}, "data": null})).unwrap();
        assert!(!empty.has_data());
        assert_eq!(empty.percent_of_orders(1.0), 0.0);
    }

    #[test]
    fn test_pending_order_ignores_extra_fields() {
        let order: PendingOrder = serde_json::from_value(json!({
            "id": 7,
            "customer": "Acme",
            "product": "Widget",
            "quantity": 5,
            "requested_date": "2024-01-02",
            "INVOICE_GENERATED": false
        }))
        .unwrap();
        assert_eq!(order.id, 7);
        assert_eq!(order.mobile_number, None);
    }

    #[test]
    fn test_widget_config_accepts_longest_gateway_delay() {
        let response: WidgetConfigResponse = serde_json::from_value(json!({
            "route": "/",
            "config": {"chatOptions": {"agentId": "a"}},
            "loader_url": "https://host/wxochat/wxoLoader.js?embed=true",
            "injection_delay_ms": u32::MAX
        }))
        .unwrap();
        assert_eq!(response.injection_delay_ms, u32::MAX);
    }
}
