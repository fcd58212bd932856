//! Chat Widget Lifecycle
//!
//! The chat widget is a third-party script that reads its settings from a
//! page-wide global. [`WidgetManager`] owns that global and the injected
//! script tag so that exactly one widget exists, configured for the agent
//! of the current page.

mod dom;
mod manager;

pub use dom::{DomHost, GlooScheduler, CONFIG_GLOBAL};
pub use manager::{ScriptHost, Scheduler, WidgetManager, WidgetSpec, LOADER_MARKER};
