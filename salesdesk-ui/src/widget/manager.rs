//! Widget Manager
//!
//! Mounting writes a fresh configuration and injects the loader script
//! after a short delay; unmounting cancels a pending injection and removes
//! both again. The DOM and the timer sit behind [`ScriptHost`] and
//! [`Scheduler`].

use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Substring identifying loader scripts in the document
pub const LOADER_MARKER: &str = "wxoLoader.js";

/// The document, as far as the widget is concerned
pub trait ScriptHost {
    /// Remove every script whose `src` contains `marker`
    fn remove_scripts(&self, marker: &str) -> usize;

    /// Replace the widget configuration global
    fn write_config(&self, config: &Value) -> Result<(), String>;

    fn clear_config(&self);

    /// Append the loader script; once loaded it initializes the widget
    fn inject_script(&self, src: &str);
}

/// One-shot delayed tasks
pub trait Scheduler {
    /// Dropping the handle cancels the task if it has not run
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// What to mount
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSpec {
    pub config: Value,
    pub loader_url: String,
    pub delay_ms: u32,
}

impl WidgetSpec {
    /// The agent pair the widget talks to
    ///
    /// Falls back to the whole configuration when it carries no
    /// `chatOptions`.
    pub fn identity(&self) -> Value {
        self.config
            .get("chatOptions")
            .cloned()
            .unwrap_or_else(|| self.config.clone())
    }
}

struct MountState<T> {
    identity: Option<Value>,
    pending: Option<T>,
}

pub struct WidgetManager<H: ScriptHost, S: Scheduler> {
    host: Rc<H>,
    scheduler: S,
    state: Rc<RefCell<MountState<S::Handle>>>,
}

impl<H: ScriptHost + 'static, S: Scheduler> WidgetManager<H, S> {
    pub fn new(host: H, scheduler: S) -> Self {
        Self {
            host: Rc::new(host),
            scheduler,
            state: Rc::new(RefCell::new(MountState {
                identity: None,
                pending: None,
            })),
        }
    }

    /// Mount the widget for `spec`
    ///
    /// Returns `Ok(false)` when the same agent is already mounted. Any
    /// previous instance is torn down first.
    pub fn mount(&self, spec: WidgetSpec) -> Result<bool, String> {
        let identity = spec.identity();
        let mut state = self.state.borrow_mut();

        if state.identity.as_ref() == Some(&identity) {
            return Ok(false);
        }

        state.pending = None;
        state.identity = None;
        self.host.remove_scripts(LOADER_MARKER);
        self.host.write_config(&spec.config)?;

        let host = Rc::clone(&self.host);
        let src = spec.loader_url;
        state.pending = Some(
            self.scheduler
                .schedule(spec.delay_ms, Box::new(move || host.inject_script(&src))),
        );
        state.identity = Some(identity);

        Ok(true)
    }

    /// Tear the widget down; safe to call repeatedly
    pub fn unmount(&self) {
        let mut state = self.state.borrow_mut();
        state.pending = None;
        state.identity = None;
        self.host.remove_scripts(LOADER_MARKER);
        self.host.clear_config();
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().identity.is_some()
    }
}
