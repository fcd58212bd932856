//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;

use crate::api::ReportData;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Latest report pushed by the gateway (chat-triggered or not)
    pub pushed_report: RwSignal<Option<ReportData>>,
    /// WebSocket connection status
    pub ws_connected: RwSignal<bool>,
    /// When the last notification arrived
    pub last_notification: RwSignal<Option<i64>>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        pushed_report: create_rw_signal(None),
        ws_connected: create_rw_signal(false),
        last_notification: create_rw_signal(None),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Record a report that arrived over the relay
    pub fn receive_report(&self, report: ReportData) {
        self.pushed_report.set(Some(report));
        self.last_notification.set(Some(chrono::Utc::now().timestamp_millis()));
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        }).forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        }).forget();
    }
}
