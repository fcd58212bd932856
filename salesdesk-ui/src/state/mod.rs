//! State Management
//!
//! Global application state and the live notification connection.

pub mod global;
pub mod websocket;

pub use global::{provide_global_state, GlobalState};
pub use websocket::{WebSocketClient, WsMessage};
