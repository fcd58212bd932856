//! Notification Types
//!
//! The two notifications the dashboard reacts to, and their wire names.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which notification an event is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// A sales report was generated
    ReportDataUpdated,
    /// An order was created
    OrderCreated,
}

impl NotificationKind {
    pub const REPORT_DATA_UPDATED: &'static str = "report-data-updated";
    pub const ORDER_CREATED: &'static str = "order-created";

    /// Wire name of this notification
    pub fn name(&self) -> &'static str {
        match self {
            NotificationKind::ReportDataUpdated => Self::REPORT_DATA_UPDATED,
            NotificationKind::OrderCreated => Self::ORDER_CREATED,
        }
    }

    /// Look up a kind by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            Self::REPORT_DATA_UPDATED => Some(NotificationKind::ReportDataUpdated),
            Self::ORDER_CREATED => Some(NotificationKind::OrderCreated),
            _ => None,
        }
    }

    pub fn all() -> [NotificationKind; 2] {
        [NotificationKind::ReportDataUpdated, NotificationKind::OrderCreated]
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named event carrying an opaque JSON payload
///
/// Lives for a single dispatch; nothing is persisted or replayed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    kind: NotificationKind,
    payload: Value,
    bubbles: bool,
}

impl Notification {
    pub fn new(kind: NotificationKind, payload: Value) -> Self {
        Self {
            kind,
            payload,
            bubbles: true,
        }
    }

    pub fn report_data_updated(payload: Value) -> Self {
        Self::new(NotificationKind::ReportDataUpdated, payload)
    }

    pub fn order_created(payload: Value) -> Self {
        Self::new(NotificationKind::OrderCreated, payload)
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// Whether the notification may propagate past its first consumer
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names() {
        assert_eq!(NotificationKind::ReportDataUpdated.name(), "report-data-updated");
        assert_eq!(NotificationKind::OrderCreated.name(), "order-created");
    }

    #[test]
    fn test_kind_from_name() {
        for kind in NotificationKind::all() {
            assert_eq!(NotificationKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(NotificationKind::from_name("watsonx-report-data"), None);
    }

    #[test]
    fn test_kind_serializes_as_wire_name() {
        let json = serde_json::to_string(&NotificationKind::ReportDataUpdated).unwrap();
        assert_eq!(json, "\"report-data-updated\"");
    }

    #[test]
    fn test_notification_bubbles() {
        let n = Notification::order_created(json!({"id": 7}));
        assert!(n.bubbles());
        assert_eq!(n.name(), "order-created");
        assert_eq!(n.payload()["id"], 7);
    }
}
