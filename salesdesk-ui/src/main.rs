//! SalesDesk Dashboard
//!
//! Sales-management dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Order entry
//! - Sales reports with charts, updated live when the chat agent runs one
//! - Fulfillment queue with invoice generation
//! - Embedded chat widget, agent chosen per page
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! Every call goes through the SalesDesk gateway over HTTP; notifications
//! arrive over the gateway's WebSocket relay.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;
mod widget;

fn main() {
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
