//! WebSocket Client
//!
//! Live connection to the gateway's notification relay. Reports the chat
//! agent generates reach the Reports page through here.

use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::global::GlobalState;
use crate::api::ReportData;

/// Notification carrying a freshly generated report
pub const REPORT_DATA_UPDATED: &str = "report-data-updated";

/// Notification carrying a freshly created order
pub const ORDER_CREATED: &str = "order-created";

const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// WebSocket message types from server
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    Connected {
        connection_id: String,
    },
    Notification {
        name: String,
        payload: serde_json::Value,
    },
    Subscribed {
        topics: Vec<String>,
    },
    Unsubscribed {
        topics: Vec<String>,
    },
    Pong,
    Error {
        message: String,
    },
}

/// WebSocket client message types
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe { topics: Vec<String> },
    Unsubscribe { topics: Vec<String> },
    Ping,
}

impl ClientMessage {
    /// Subscription sent on every (re)connect
    pub fn subscribe_all() -> Self {
        ClientMessage::Subscribe {
            topics: vec![REPORT_DATA_UPDATED.to_string(), ORDER_CREATED.to_string()],
        }
    }
}

/// WebSocket client for live notifications
#[derive(Clone)]
pub struct WebSocketClient {
    ws: Rc<RefCell<Option<WebSocket>>>,
    url: String,
    reconnect_attempts: Rc<RefCell<u32>>,
}

impl WebSocketClient {
    pub fn new(url: &str) -> Self {
        Self {
            ws: Rc::new(RefCell::new(None)),
            url: url.to_string(),
            reconnect_attempts: Rc::new(RefCell::new(0)),
        }
    }

    /// Connect to the relay
    pub fn connect(&self, state: GlobalState) {
        match WebSocket::new(&self.url) {
            Ok(ws) => {
                self.setup_handlers(&ws, state);
                *self.ws.borrow_mut() = Some(ws);
            }
            Err(e) => {
                web_sys::console::error_1(&format!("WebSocket connection failed: {:?}", e).into());
                self.schedule_reconnect(state);
            }
        }
    }

    fn setup_handlers(&self, ws: &WebSocket, state: GlobalState) {
        // On open: subscribe before anything else
        let client = self.clone();
        let state_clone = state.clone();
        let on_open = Closure::wrap(Box::new(move |_: JsValue| {
            web_sys::console::log_1(&"WebSocket connected".into());
            state_clone.ws_connected.set(true);
            *client.reconnect_attempts.borrow_mut() = 0;

            if let Err(e) = client.send(&ClientMessage::subscribe_all()) {
                web_sys::console::error_1(&format!("Subscribe failed: {}", e).into());
            }
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        // On message
        let state_clone = state.clone();
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Ok(text) = event.data().dyn_into::<js_sys::JsString>() {
                let text_str: String = text.into();
                handle_message(&text_str, &state_clone);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message.forget();

        // On close
        let client = self.clone();
        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            web_sys::console::log_1(
                &format!("WebSocket closed: code={}, reason={}", event.code(), event.reason()).into(),
            );
            state.ws_connected.set(false);
            client.schedule_reconnect(state.clone());
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();

        // On error
        let on_error = Closure::wrap(Box::new(move |e: JsValue| {
            web_sys::console::error_1(&format!("WebSocket error: {:?}", e).into());
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();
    }

    /// Schedule a reconnect attempt with exponential backoff
    fn schedule_reconnect(&self, state: GlobalState) {
        let attempts = *self.reconnect_attempts.borrow();
        if attempts >= MAX_RECONNECT_ATTEMPTS {
            web_sys::console::error_1(&"Max reconnect attempts reached".into());
            return;
        }

        let delay = reconnect_delay_ms(attempts);
        *self.reconnect_attempts.borrow_mut() = attempts + 1;

        let client = self.clone();
        gloo_timers::callback::Timeout::new(delay, move || {
            web_sys::console::log_1(&format!("Attempting reconnect (attempt {})", attempts + 1).into());
            client.connect(state);
        }).forget();
    }

    /// Send a message to the server
    pub fn send(&self, message: &ClientMessage) -> Result<(), String> {
        let ws_guard = self.ws.borrow();
        let ws = ws_guard.as_ref().ok_or("WebSocket not connected")?;

        let json = serde_json::to_string(message).map_err(|e| e.to_string())?;
        ws.send_with_str(&json).map_err(|e| format!("{:?}", e))
    }
}

/// 1s, 2s, 4s, ... capped at 30s
fn reconnect_delay_ms(attempts: u32) -> u32 {
    2_u32.saturating_pow(attempts).saturating_mul(1000).min(30_000)
}

/// Handle incoming WebSocket message
fn handle_message(text: &str, state: &GlobalState) {
    let msg = match serde_json::from_str::<WsMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to parse WebSocket message: {}", e).into());
            return;
        }
    };

    match msg {
        WsMessage::Connected { connection_id } => {
            web_sys::console::log_1(&format!("Connected with ID: {}", connection_id).into());
        }
        WsMessage::Notification { name, payload } => match name.as_str() {
            REPORT_DATA_UPDATED => match serde_json::from_value::<ReportData>(payload) {
                Ok(report) => state.receive_report(report),
                Err(e) => {
                    web_sys::console::error_1(&format!("Unreadable report notification: {}", e).into());
                }
            },
            ORDER_CREATED => {
                state.last_notification.set(Some(chrono::Utc::now().timestamp_millis()));
                web_sys::console::log_1(&"Order created".into());
            }
            other => {
                web_sys::console::log_1(&format!("Ignoring notification: {}", other).into());
            }
        },
        WsMessage::Subscribed { topics } => {
            web_sys::console::log_1(&format!("Subscribed to: {:?}", topics).into());
        }
        WsMessage::Unsubscribed { topics } => {
            web_sys::console::log_1(&format!("Unsubscribed from: {:?}", topics).into());
        }
        WsMessage::Pong => {}
        WsMessage::Error { message } => {
            web_sys::console::error_1(&format!("Server error: {}", message).into());
            state.show_error(&message);
        }
    }
}

/// `http(s)://host` to `ws(s)://host/ws`
pub fn relay_url(api_base: &str) -> String {
    let ws_base = api_base.replace("http://", "ws://").replace("https://", "wss://");
    format!("{}/ws", ws_base.trim_end_matches('/'))
}

/// Initialize the relay connection (call from app root)
pub fn init_websocket(state: GlobalState, api_base: &str) {
    let client = WebSocketClient::new(&relay_url(api_base));
    client.connect(state);
}
