//! Event Bridge
//!
//! Process-wide publish/subscribe for notifications produced by the
//! interception layer.
//!
//! ## Architecture
//!
//! - **Notification**: a named event with an opaque JSON payload
//! - **EventBus**: synchronous dispatch to handlers in registration order
//! - **Subscription**: guard that deregisters its handler on release
//!
//! ## Usage
//!
//! ```rust
//! use salesdesk::events::{EventBus, Notification, NotificationKind};
//! use serde_json::json;
//!
//! let bus = EventBus::new();
//! let sub = bus.subscribe(NotificationKind::OrderCreated, |n| {
//!     println!("order created: {}", n.payload());
//! });
//!
//! bus.publish(Notification::order_created(json!({"success": true})));
//! sub.unsubscribe();
//! ```

mod bus;
mod notification;

pub use bus::{EventBus, Subscription};
pub use notification::{Notification, NotificationKind};
