//! Gateway API
//!
//! HTTP calls to the SalesDesk gateway and the payloads they carry.

mod client;

pub use client::*;
