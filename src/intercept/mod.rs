//! Network Interception Layer
//!
//! The gateway makes every outbound HTTP call through a single
//! [`FetchSlot`]. At startup the slot's transport is wrapped once by an
//! [`InterceptingTransport`], which watches for a few URL substrings and
//! turns the matching responses into [`Notification`](crate::events::Notification)s
//! without touching what the caller receives.
//!
//! ## Flow
//!
//! 1. Caller sends a request through the slot
//! 2. Non-matching URLs go straight to the underlying transport
//! 3. Matching URLs are still sent unmodified; the response body is
//!    duplicated and parsed as JSON on a background task
//! 4. A successful parse is published on the [`EventBus`](crate::events::EventBus);
//!    a failed parse is logged and dropped

mod interceptor;
mod slot;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use interceptor::{
    default_rules, InterceptingTransport, WatchRule, ORDER_PATTERN, REPORT_PATTERN,
};
pub use slot::FetchSlot;
pub use transport::{
    HttpTransport, InboundResponse, Method, OutboundRequest, Transport, TransportError,
};
