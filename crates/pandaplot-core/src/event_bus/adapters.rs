//! Per-component publish and subscribe helpers.
//!
//! A panel holds an [`EventPublisher`], an [`EventSubscriber`], or both (an
//! [`EventComponent`]). The publisher tags every event with the panel's
//! identity; the subscriber remembers what it subscribed so the panel can
//! tear everything down in one call when it is closed.

use parking_lot::Mutex;
use std::sync::Arc;

use super::bus::EventBus;
use super::registry::EventHandler;
use crate::error::EventBusError;
use crate::payload::{keys, Payload};

/// Resolve a scope name to its subscription pattern.
///
/// Unknown scope names are returned unchanged and used as literal patterns.
///
/// | scope                | pattern            |
/// |----------------------|--------------------|
/// | `dataset`            | `dataset.changed`  |
/// | `dataset_operations` | `dataset.*`        |
/// | `project`            | `project.changed`  |
/// | `project_items`      | `project.item_*`   |
/// | `ui`                 | `ui.*`             |
/// | `analysis`           | `analysis.*`       |
pub fn scope_pattern(scope: &str) -> &str {
    match scope {
        "dataset" => "dataset.changed",
        "dataset_operations" => "dataset.*",
        "project" => "project.changed",
        "project_items" => "project.item_*",
        "ui" => "ui.*",
        "analysis" => "analysis.*",
        other => other,
    }
}

/// Publishing capability for a component
#[derive(Debug, Clone)]
pub struct EventPublisher {
    bus: Arc<EventBus>,
    component_id: String,
}

impl EventPublisher {
    /// Create a publisher that tags events with `component_id`
    pub fn new(bus: Arc<EventBus>, component_id: impl Into<String>) -> Self {
        Self {
            bus,
            component_id: component_id.into(),
        }
    }

    /// Identity stamped into `source_component`
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// Emit an event with `source_component` set to this component
    pub fn publish_event(&self, event_type: &str, data: Payload) {
        let mut data = data;
        data.stamp(keys::SOURCE_COMPONENT, &self.component_id);
        self.bus.emit(event_type, data);
    }
}

/// Subscribing capability for a component.
///
/// Every subscription made through this adapter is recorded and removed by
/// [`EventSubscriber::unsubscribe_all`], which also runs on drop.
#[derive(Debug)]
pub struct EventSubscriber {
    bus: Arc<EventBus>,
    component_id: String,
    subscriptions: Mutex<Vec<(String, EventHandler)>>,
}

impl EventSubscriber {
    /// Create a subscriber owned by `component_id`
    pub fn new(bus: Arc<EventBus>, component_id: impl Into<String>) -> Self {
        Self {
            bus,
            component_id: component_id.into(),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Owning component
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// Subscribe a handler and remember it for teardown
    pub fn subscribe_to_event(
        &self,
        pattern: &str,
        handler: EventHandler,
    ) -> Result<(), EventBusError> {
        self.bus
            .subscribe_as(pattern, handler.clone(), &self.component_id)?;
        self.subscriptions.lock().push((pattern.to_string(), handler));
        Ok(())
    }

    /// Subscribe several `(pattern, handler)` pairs, stopping at the first error
    pub fn subscribe_to_multiple_events<I, S>(&self, subscriptions: I) -> Result<(), EventBusError>
    where
        I: IntoIterator<Item = (S, EventHandler)>,
        S: AsRef<str>,
    {
        for (pattern, handler) in subscriptions {
            self.subscribe_to_event(pattern.as_ref(), handler)?;
        }
        Ok(())
    }

    /// Subscribe at a named granularity, see [`scope_pattern`]
    pub fn subscribe_to_scope(&self, scope: &str, handler: EventHandler) -> Result<(), EventBusError> {
        self.subscribe_to_event(scope_pattern(scope), handler)
    }

    /// Subscribe to all dataset events concerning one dataset.
    ///
    /// The handler only sees payloads whose `dataset_id` equals `dataset_id`.
    pub fn subscribe_to_dataset<F>(&self, dataset_id: &str, handler: F) -> Result<(), EventBusError>
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        let dataset_id = dataset_id.to_string();
        let filtered = EventHandler::new(move |payload: &Payload| {
            if payload.get_str("dataset_id") == Some(dataset_id.as_str()) {
                handler(payload);
            }
        });
        self.subscribe_to_event("dataset.*", filtered)
    }

    /// Number of live subscriptions made through this adapter
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// Remove every subscription made through this adapter.
    ///
    /// Safe to call repeatedly; later calls do nothing.
    pub fn unsubscribe_all(&self) {
        let subscriptions = std::mem::take(&mut *self.subscriptions.lock());
        if subscriptions.is_empty() {
            return;
        }
        for (pattern, handler) in &subscriptions {
            self.bus.unsubscribe(pattern, handler);
        }
        tracing::debug!(
            "{} released {} subscription(s)",
            self.component_id,
            subscriptions.len()
        );
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        self.unsubscribe_all();
    }
}

/// Publisher and subscriber capabilities over one bus reference
#[derive(Debug)]
pub struct EventComponent {
    publisher: EventPublisher,
    subscriber: EventSubscriber,
}

impl EventComponent {
    /// Create both capabilities for `component_id`
    pub fn new(bus: Arc<EventBus>, component_id: impl Into<String>) -> Self {
        let component_id = component_id.into();
        Self {
            publisher: EventPublisher::new(Arc::clone(&bus), component_id.clone()),
            subscriber: EventSubscriber::new(bus, component_id),
        }
    }

    /// Component identity
    pub fn component_id(&self) -> &str {
        self.publisher.component_id()
    }

    /// Publishing half
    pub fn publisher(&self) -> &EventPublisher {
        &self.publisher
    }

    /// Subscribing half
    pub fn subscriber(&self) -> &EventSubscriber {
        &self.subscriber
    }

    /// See [`EventPublisher::publish_event`]
    pub fn publish_event(&self, event_type: &str, data: Payload) {
        self.publisher.publish_event(event_type, data);
    }

    /// See [`EventSubscriber::subscribe_to_event`]
    pub fn subscribe_to_event(
        &self,
        pattern: &str,
        handler: EventHandler,
    ) -> Result<(), EventBusError> {
        self.subscriber.subscribe_to_event(pattern, handler)
    }

    /// See [`EventSubscriber::subscribe_to_scope`]
    pub fn subscribe_to_scope(&self, scope: &str, handler: EventHandler) -> Result<(), EventBusError> {
        self.subscriber.subscribe_to_scope(scope, handler)
    }

    /// See [`EventSubscriber::unsubscribe_all`]
    pub fn unsubscribe_all(&self) {
        self.subscriber.unsubscribe_all();
    }
}
