//! Remote Sales API
//!
//! Everything the gateway knows about the external sales/orders/fulfillment
//! service: request bodies, the response envelope, and a client that sends
//! through the intercepted fetch slot.

mod client;
mod types;

pub use client::{
    SalesApiClient, SalesApiConfig, UpstreamError, CREATE_ORDER_PATH, GENERATE_REPORT_PATH,
    PENDING_FULFILLMENT_PATH, PROCESS_FULFILLMENT_PATH,
};
pub use types::{
    CreateOrder, Envelope, InvoiceRequest, PendingOrder, ReportRequest, ValidationError,
    ALL_SALES_QUERY, DATE_FORMAT,
};
