//! WebSocket Notification Relay
//!
//! Pushes event bus notifications to connected dashboards.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Manages active connections and their topics, and
//!   subscribes to the event bus
//! - **Handler**: Handles WebSocket upgrade and message processing
//! - **Messages**: Defines client and server message formats
//!
//! ## Usage
//!
//! Clients connect to `/ws` and subscribe to notification names:
//! - `report-data-updated` - A sales report was generated
//! - `order-created` - An order was created
//! - `*` - Everything
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8082/ws');
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'subscribe', topics: ['report-data-updated']}));
//! };
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'notification') console.log(msg.name, msg.payload);
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, ConnectionId, HubConfig, HubError};
pub use messages::{ClientMessage, ServerMessage, WsEvent, ALL_TOPICS};
