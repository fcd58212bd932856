//! Event Bus
//!
//! Typed publish/subscribe registry. Dispatch is synchronous and runs over a
//! snapshot of the handler list, so handlers may subscribe or unsubscribe
//! while a notification is being delivered.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::notification::{Notification, NotificationKind};

type Handler = Arc<dyn Fn(&Notification) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    /// Handlers per kind, in registration order
    handlers: HashMap<NotificationKind, Vec<(u64, Handler)>>,
}

/// Process-wide notification bus
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one notification kind
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// released, either with [`Subscription::unsubscribe`] or by dropping it.
    pub fn subscribe<F>(&self, kind: NotificationKind, handler: F) -> Subscription
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .handlers
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));

        tracing::debug!(notification = %kind, subscription_id = id, "Handler subscribed");

        Subscription {
            registry: Arc::downgrade(&self.registry),
            kind,
            id,
            active: true,
        }
    }

    /// Deliver a notification to every handler registered for its kind
    ///
    /// Returns the number of handlers invoked.
    pub fn publish(&self, notification: Notification) -> usize {
        let snapshot: Vec<Handler> = {
            let registry = lock(&self.registry);
            registry
                .handlers
                .get(&notification.kind())
                .map(|handlers| handlers.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };

        for handler in &snapshot {
            handler(&notification);
        }

        tracing::trace!(
            notification = %notification.kind(),
            handlers = snapshot.len(),
            "Notification published"
        );

        snapshot.len()
    }

    /// Number of live handlers for a kind
    pub fn subscriber_count(&self, kind: NotificationKind) -> usize {
        lock(&self.registry)
            .handlers
            .get(&kind)
            .map(|h| h.len())
            .unwrap_or(0)
    }
}

/// Registration handle returned by [`EventBus::subscribe`]
#[must_use = "dropping a Subscription deregisters its handler"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    kind: NotificationKind,
    id: u64,
    active: bool,
}

impl Subscription {
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Deregister the handler now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keep the handler registered for the life of the bus
    pub fn forget(mut self) {
        self.active = false;
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        // The removed handler is dropped after the lock is released, since it
        // may own subscriptions of its own
        let removed = {
            let mut registry = lock(&registry);
            let mut removed = None;
            if let Some(handlers) = registry.handlers.get_mut(&self.kind) {
                if let Some(pos) = handlers.iter().position(|(id, _)| *id == self.id) {
                    removed = Some(handlers.remove(pos));
                }
                if handlers.is_empty() {
                    registry.handlers.remove(&self.kind);
                }
            }
            removed
        };
        drop(removed);

        tracing::debug!(notification = %self.kind, subscription_id = self.id, "Handler unsubscribed");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // A panicking handler never holds the lock, so the data is still consistent
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(Notification::order_created(json!({}))), 0);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let subs: Vec<_> = (0..3)
            .map(|i| {
                let seen = Arc::clone(&seen);
                bus.subscribe(NotificationKind::ReportDataUpdated, move |_| {
                    seen.lock().unwrap().push(i);
                })
            })
            .collect();

        let invoked = bus.publish(Notification::report_data_updated(json!({})));
        assert_eq!(invoked, 3);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn test_handler_receives_exact_payload() {
        let bus = EventBus::new();
        let received = Arc::new(Mutex::new(None));
        let received_clone = Arc::clone(&received);

        let _sub = bus.subscribe(NotificationKind::ReportDataUpdated, move |n| {
            *received_clone.lock().unwrap() = Some(n.payload().clone());
        });

        let payload = json!({"summary": {"totalOrders": 4}, "dateRange": "2024-01-01 to 2024-01-31"});
        bus.publish(Notification::report_data_updated(payload.clone()));

        assert_eq!(received.lock().unwrap().as_ref(), Some(&payload));
    }

    #[test]
    fn test_kinds_are_isolated() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let _sub = bus.subscribe(NotificationKind::OrderCreated, move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(Notification::report_data_updated(json!({})));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        bus.publish(Notification::order_created(json!({})));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let sub = bus.subscribe(NotificationKind::OrderCreated, move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish(Notification::order_created(json!({})));
        sub.unsubscribe();

        for _ in 0..5 {
            bus.publish(Notification::order_created(json!({})));
        }

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(NotificationKind::OrderCreated), 0);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let bus = EventBus::new();
        {
            let _sub = bus.subscribe(NotificationKind::OrderCreated, |_| {});
            assert_eq!(bus.subscriber_count(NotificationKind::OrderCreated), 1);
        }
        assert_eq!(bus.subscriber_count(NotificationKind::OrderCreated), 0);
    }

    #[test]
    fn test_forget_keeps_handler() {
        let bus = EventBus::new();
        bus.subscribe(NotificationKind::OrderCreated, |_| {}).forget();
        assert_eq!(bus.subscriber_count(NotificationKind::OrderCreated), 1);
    }

    #[test]
    fn test_subscribe_from_inside_handler() {
        let bus = EventBus::new();
        let bus_clone = bus.clone();
        let inner_subs = Arc::new(Mutex::new(Vec::new()));
        let inner_clone = Arc::clone(&inner_subs);

        let _sub = bus.subscribe(NotificationKind::OrderCreated, move |_| {
            let sub = bus_clone.subscribe(NotificationKind::OrderCreated, |_| {});
            inner_clone.lock().unwrap().push(sub);
        });

        // The handler added mid-dispatch is not part of this dispatch
        assert_eq!(bus.publish(Notification::order_created(json!({}))), 1);
        assert_eq!(bus.subscriber_count(NotificationKind::OrderCreated), 2);
    }

    #[test]
    fn test_subscription_outlives_bus() {
        let bus = EventBus::new();
        let sub = bus.subscribe(NotificationKind::OrderCreated, |_| {});
        drop(bus);
        sub.unsubscribe();
    }
}
