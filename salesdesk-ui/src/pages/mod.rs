//! Pages
//!
//! Top-level page components for each route.

pub mod fulfillment;
pub mod orders;
pub mod reports;

pub use fulfillment::Fulfillment;
pub use orders::Orders;
pub use reports::Reports;
