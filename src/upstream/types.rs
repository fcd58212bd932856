//! Sales API Payloads
//!
//! Request bodies sent to the remote sales API and the envelope every
//! response comes back in.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query sent when no date range is given
pub const ALL_SALES_QUERY: &str = "All sales data";

/// Date format used by the sales API
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================
// Orders
// ============================================

/// Body of `POST /api/orders/create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub customer: String,
    pub product: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tentative_delivery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
}

impl CreateOrder {
    /// Check required fields and normalize optional ones
    ///
    /// Empty optional strings are treated as absent.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.customer = self.customer.trim().to_string();
        self.product = self.product.trim().to_string();

        if self.customer.is_empty() {
            return Err(ValidationError::Required("customer"));
        }
        if self.product.is_empty() {
            return Err(ValidationError::Required("product"));
        }
        if self.quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity(self.quantity));
        }

        self.tentative_delivery_date = non_empty(self.tentative_delivery_date);
        self.contact_number = non_empty(self.contact_number);

        Ok(self)
    }
}

// ============================================
// Reports
// ============================================

/// Body of `POST /api/sales/generate-report`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl ReportRequest {
    /// Report over an explicit date range
    pub fn for_range(start: impl Into<String>, end: impl Into<String>) -> Self {
        let start = start.into();
        let end = end.into();
        Self {
            query: range_query(&start, &end),
            start_date: Some(start),
            end_date: Some(end),
        }
    }

    /// Report over everything the API has
    pub fn all_time() -> Self {
        Self {
            query: ALL_SALES_QUERY.to_string(),
            start_date: None,
            end_date: None,
        }
    }

    /// Report over the last `days` days ending on `today` (0 means just today)
    pub fn last_days(days: i64, today: NaiveDate) -> Self {
        let start = today - Duration::days(days);
        Self::for_range(
            start.format(DATE_FORMAT).to_string(),
            today.format(DATE_FORMAT).to_string(),
        )
    }

    /// Fill in a missing query from the date range
    ///
    /// A chat agent may send only dates, or only a free-text query; both are
    /// accepted as long as the result has a query. A lone date is dropped.
    pub fn normalize(mut self) -> Self {
        self.start_date = non_empty(self.start_date);
        self.end_date = non_empty(self.end_date);
        if self.start_date.is_none() || self.end_date.is_none() {
            self.start_date = None;
            self.end_date = None;
        }

        if self.query.trim().is_empty() {
            self.query = match (&self.start_date, &self.end_date) {
                (Some(start), Some(end)) => range_query(start, end),
                _ => ALL_SALES_QUERY.to_string(),
            };
        }
        self
    }
}

fn range_query(start: &str, end: &str) -> String {
    format!("Sales report from {} to {}", start, end)
}

// ============================================
// Fulfillment
// ============================================

/// Body of `POST /api/fulfillment/process`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub sales_id: i64,
    pub amount: f64,
}

impl InvoiceRequest {
    pub fn validate(self) -> Result<Self, ValidationError> {
        if !self.amount.is_finite() {
            return Err(ValidationError::InvalidAmount);
        }
        Ok(self)
    }
}

/// An order waiting for an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub id: i64,
    pub customer: String,
    pub product: String,
    pub quantity: i64,
    #[serde(default)]
    pub requested_date: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(rename = "INVOICE_GENERATED", default)]
    pub invoice_generated: bool,
}

// ============================================
// Envelope
// ============================================

/// `{success, data|error}` wrapper around every sales API response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Turn `success: false` into an error carrying the API's message
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.error.unwrap_or_else(|| "Request was not successful".to_string()))
        }
    }
}

// ============================================
// Errors
// ============================================

/// Local validation failures
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("quantity must be a positive integer, got {0}")]
    NonPositiveQuantity(i64),

    #[error("amount must be a valid number")]
    InvalidAmount,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(customer: &str, product: &str, quantity: i64) -> CreateOrder {
        CreateOrder {
            customer: customer.to_string(),
            product: product.to_string(),
            quantity,
            tentative_delivery_date: Some(String::new()),
            contact_number: None,
        }
    }

    #[test]
    fn test_order_serializes_quantity_as_integer() {
        let order = order("Acme", "Widget", 5).validate().unwrap();
        let body = serde_json::to_value(&order).unwrap();
        assert_eq!(body, json!({"customer": "Acme", "product": "Widget", "quantity": 5}));
    }

    #[test]
    fn test_order_required_fields() {
        assert_eq!(
            order("  ", "Widget", 5).validate(),
            Err(ValidationError::Required("customer"))
        );
        assert_eq!(
            order("Acme", "", 5).validate(),
            Err(ValidationError::Required("product"))
        );
        assert_eq!(
            order("Acme", "Widget", 0).validate(),
            Err(ValidationError::NonPositiveQuantity(0))
        );
    }

    #[test]
    fn test_order_keeps_delivery_date_and_contact() {
        let mut o = order("Acme", "Widget", 2);
        o.tentative_delivery_date = Some("2024-02-01".to_string());
        o.contact_number = Some("+15550100".to_string());
        let body = serde_json::to_value(o.validate().unwrap()).unwrap();
        assert_eq!(body["tentativeDeliveryDate"], "2024-02-01");
        assert_eq!(body["contactNumber"], "+15550100");
    }

    #[test]
    fn test_report_for_range_body() {
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
    fn test_report_all_time_body() {
        let body = serde_json::to_value(ReportRequest::all_time()).unwrap();
        assert_eq!(body, json!({"query": "All sales data"}));
    }

    #[test]
    fn test_report_last_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let week = ReportRequest::last_days(7, today);
        assert_eq!(week.start_date.as_deref(), Some("2024-03-03"));
        assert_eq!(week.end_date.as_deref(), Some("2024-03-10"));

        let single = ReportRequest::last_days(0, today);
        assert_eq!(single.query, "Sales report from 2024-03-10 to 2024-03-10");
    }

    #[test]
    fn test_report_normalize() {
        let dates_only: ReportRequest =
            serde_json::from_value(json!({"startDate": "2024-01-01", "endDate": "2024-01-31"})).unwrap();
        assert_eq!(dates_only.normalize(), ReportRequest::for_range("2024-01-01", "2024-01-31"));

        let empty: ReportRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.normalize(), ReportRequest::all_time());

        let free_text: ReportRequest =
            serde_json::from_value(json!({"query": "top customers last quarter"})).unwrap();
        assert_eq!(free_text.clone().normalize(), free_text);
    }

    #[test]
    fn test_report_normalize_drops_partial_range() {
        let start_only: ReportRequest =
            serde_json::from_value(json!({"startDate": "2024-01-01"})).unwrap();
        let body = serde_json::to_value(start_only.normalize()).unwrap();
        assert_eq!(body, json!({"query": "All sales data"}));

        let end_only: ReportRequest = serde_json::from_value(
            json!({"query": "top customers", "startDate": "", "endDate": "2024-01-31"}),
        )
        .unwrap();
        let body = serde_json::to_value(end_only.normalize()).unwrap();
        assert_eq!(body, json!({"query": "top customers"}));
    }

    #[test]
    fn test_invoice_body() {
        let req = InvoiceRequest { sales_id: 42, amount: 199.5 }.validate().unwrap();
        assert_eq!(serde_json::to_value(req).unwrap(), json!({"salesId": 42, "amount": 199.5}));
        assert_eq!(
            InvoiceRequest { sales_id: 1, amount: f64::NAN }.validate(),
            Err(ValidationError::InvalidAmount)
        );
    }

    #[test]
    fn test_pending_order_decode() {
        let env: Envelope<Vec<PendingOrder>> = serde_json::from_value(json!({
            "success": true,
            "data": [{
                "id": 3,
                "customer": "Acme",
                "product": "Widget",
                "quantity": 5,
                "requested_date": "2024-01-05",
                "mobile_number": "555",
                "INVOICE_GENERATED": false
            }]
        }))
        .unwrap();
        let orders = env.into_result().unwrap().unwrap();
        assert_eq!(orders[0].id, 3);
        assert!(!orders[0].invoice_generated);
    }

    #[test]
    fn test_envelope_failure() {
        let env: Envelope<serde_json::Value> =
            serde_json::from_value(json!({"success": false, "error": "Product not found"})).unwrap();
        assert_eq!(env.into_result(), Err("Product not found".to_string()));
    }
}
