//! Scripted transport for tests

use async_trait::async_trait;
use std::sync::Mutex;

use super::transport::{InboundResponse, OutboundRequest, Transport, TransportError};

/// Answers by URL substring and records every request it sees
#[derive(Default)]
pub(crate) struct StubTransport {
    routes: Vec<(String, InboundResponse)>,
    calls: Mutex<Vec<OutboundRequest>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, pattern: &str, status: u16, body: serde_json::Value) -> Self {
        self.routes
            .push((pattern.to_string(), InboundResponse::json(status, &body)));
        self
    }

    pub(crate) fn respond_raw(mut self, pattern: &str, status: u16, body: &'static str) -> Self {
        self.routes.push((
            pattern.to_string(),
            InboundResponse::new(status, Some("text/html".to_string()), body.as_bytes()),
        ));
        self
    }

    pub(crate) fn calls(&self) -> Vec<OutboundRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// JSON body of the last request sent
    pub(crate) fn last_body(&self) -> Option<serde_json::Value> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .and_then(|r| r.body.as_ref())
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, TransportError> {
        let url = request.url.clone();
        self.calls.lock().unwrap().push(request);

        self.routes
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| TransportError::Unavailable(format!("no stub for {}", url)))
    }
}
