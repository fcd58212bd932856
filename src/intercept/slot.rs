//! Fetch Slot
//!
//! The gateway's single process-wide fetch capability.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::interceptor::{InterceptingTransport, WatchRule};
use super::transport::{InboundResponse, OutboundRequest, Transport, TransportError};
use crate::events::EventBus;

/// Holds the transport every outbound call goes through
///
/// The interceptor is installed at most once; later installs are no-ops so
/// the wrapper is never wrapped again.
pub struct FetchSlot {
    current: RwLock<Arc<dyn Transport>>,
    intercepted: AtomicBool,
}

impl FetchSlot {
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self {
            current: RwLock::new(transport),
            intercepted: AtomicBool::new(false),
        }
    }

    /// The transport currently installed
    pub fn transport(&self) -> Arc<dyn Transport> {
        let current = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&current)
    }

    /// Send a request through whatever transport is installed
    pub async fn fetch(&self, request: OutboundRequest) -> Result<InboundResponse, TransportError> {
        let transport = self.transport();
        transport.send(request).await
    }

    /// Wrap the current transport with an interceptor
    ///
    /// Returns `false` when an interceptor was already installed.
    pub fn install_interceptor(&self, rules: Vec<WatchRule>, bus: EventBus) -> bool {
        if self.intercepted.swap(true, Ordering::SeqCst) {
            tracing::warn!("Interceptor already installed, ignoring second install");
            return false;
        }

        let patterns: Vec<String> = rules.iter().map(|r| r.pattern().to_string()).collect();

        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let original = Arc::clone(&current);
        *current = Arc::new(InterceptingTransport::new(original, rules, bus));

        tracing::info!(patterns = ?patterns, "Interceptor installed");
        true
    }

    pub fn is_intercepted(&self) -> bool {
        self.intercepted.load(Ordering::SeqCst)
    }
}
