//! Event Bus implementation.
//!
//! Provides the [`EventBus`] facade composing the subscription registry,
//! the hierarchy table and the dispatcher. One bus is built at application
//! start and shared as `Arc<EventBus>` with every component.

use super::dispatch::Dispatcher;
use super::hierarchy::{EventHierarchy, HierarchyChain};
use super::registry::{EventHandler, SubscriptionHandle, SubscriptionRegistry};
use crate::error::EventBusError;
use crate::payload::Payload;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Pre-populate the hierarchy with the application table.
    pub load_default_hierarchy: bool,
    /// Log every dispatched level at trace level.
    pub trace_dispatch: bool,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            load_default_hierarchy: true,
            trace_dispatch: false,
        }
    }
}

/// Central event bus for application-wide event distribution
pub struct EventBus {
    registry: SubscriptionRegistry,
    hierarchy: EventHierarchy,
    config: EventBusConfig,
}

impl EventBus {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        let hierarchy = if config.load_default_hierarchy {
            EventHierarchy::with_defaults()
        } else {
            EventHierarchy::new()
        };
        Self {
            registry: SubscriptionRegistry::new(),
            hierarchy,
            config,
        }
    }

    /// Subscribe a closure to an event type or wildcard pattern.
    ///
    /// The returned handle is the only way to unsubscribe a closure
    /// registered this way.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> Result<SubscriptionHandle, EventBusError>
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        self.registry
            .subscribe(pattern, EventHandler::new(handler), None)
    }

    /// Subscribe a closure that may fail; failures are logged, not propagated
    pub fn subscribe_fallible<F>(
        &self,
        pattern: &str,
        handler: F,
    ) -> Result<SubscriptionHandle, EventBusError>
    where
        F: Fn(&Payload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.registry
            .subscribe(pattern, EventHandler::fallible(handler), None)
    }

    /// Subscribe a shared handler, keeping its identity for [`EventBus::unsubscribe`]
    pub fn subscribe_handler(
        &self,
        pattern: &str,
        handler: EventHandler,
    ) -> Result<SubscriptionHandle, EventBusError> {
        self.registry.subscribe(pattern, handler, None)
    }

    /// Subscribe a shared handler on behalf of a component
    pub fn subscribe_as(
        &self,
        pattern: &str,
        handler: EventHandler,
        component_id: &str,
    ) -> Result<SubscriptionHandle, EventBusError> {
        self.registry.subscribe(pattern, handler, Some(component_id))
    }

    /// Remove the first subscription of `handler` to `pattern`.
    ///
    /// Returns true if a subscription was found and removed.
    pub fn unsubscribe(&self, pattern: &str, handler: &EventHandler) -> bool {
        self.registry.unsubscribe(pattern, handler)
    }

    /// Remove the subscription a handle refers to
    pub fn unsubscribe_handle(&self, handle: &SubscriptionHandle) -> bool {
        self.registry.unsubscribe_by_id(handle.id())
    }

    /// Publish an event and every level of its hierarchy.
    ///
    /// All matching handlers run on the calling thread before this returns.
    /// Handler failures are logged and never reach the publisher.
    pub fn emit(&self, event_type: &str, data: Payload) {
        let report = Dispatcher::new(&self.registry, &self.hierarchy)
            .with_tracing(self.config.trace_dispatch)
            .emit(event_type, data);
        tracing::debug!(
            "Emitted {} over {} level(s): {} delivered, {} failed",
            event_type,
            report.levels,
            report.delivered,
            report.failed
        );
    }

    /// Number of subscriptions for a pattern, or in total
    pub fn subscribers_count(&self, pattern: Option<&str>) -> usize {
        self.registry.count(pattern)
    }

    /// Declare the ancestor chain of an event type
    pub fn register_hierarchy<I, S>(&self, event_type: &str, chain: I) -> Result<(), EventBusError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hierarchy.register(event_type, chain)
    }

    /// Chain an emit of `event_type` would dispatch
    pub fn resolve_hierarchy(&self, event_type: &str) -> HierarchyChain {
        self.hierarchy.resolve(event_type)
    }

    /// The hierarchy table
    pub fn hierarchy(&self) -> &EventHierarchy {
        &self.hierarchy
    }

    /// Drop every subscription
    pub fn clear_all_subscriptions(&self) {
        self.registry.clear();
        tracing::debug!("All subscriptions cleared");
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers_count(None))
            .field("hierarchies", &self.hierarchy.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_event_bus_creation() {
        let bus = EventBus::new();
        assert_eq!(bus.subscribers_count(None), 0);
        assert!(bus.hierarchy().contains("folder.created"));

        let bare = EventBus::with_config(EventBusConfig {
            load_default_hierarchy: false,
            ..Default::default()
        });
        assert!(bare.hierarchy().is_empty());
    }

    #[test]
    fn test_subscribe_and_unsubscribe_handle() {
        let bus = EventBus::new();

        let handle = bus.subscribe("ui.tab_changed", |_| {}).expect("subscribe");
        assert_eq!(bus.subscribers_count(None), 1);

        assert!(bus.unsubscribe_handle(&handle));
        assert_eq!(bus.subscribers_count(None), 0);

        // Double unsubscribe should return false
        assert!(!bus.unsubscribe_handle(&handle));
        assert!(!bus.unsubscribe("ui.tab_changed", handle.handler()));
    }

    #[test]
    fn test_event_delivery() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        bus.subscribe("project.saved", move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        })
        .expect("subscribe");

        bus.emit("project.saved", payload! { "path" => "/tmp/a.ppp" });
        bus.emit("project.loaded", Payload::new());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_emit_payload_is_enriched() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        bus.subscribe("dataset.exported", move |p| {
            *sink.lock() = Some(p.clone());
        })
        .expect("subscribe");

        bus.emit("dataset.exported", payload! { "format" => "csv" });

        let seen = seen.lock().clone().expect("handler ran");
        assert_eq!(seen.get_str("format"), Some("csv"));
        assert_eq!(seen.event_type(), Some("dataset.exported"));
        assert_eq!(seen.original_event(), Some("dataset.exported"));
        assert!(seen.timestamp().is_some());
        assert_eq!(seen.source_component(), None);
    }

    #[test]
    fn test_register_hierarchy_through_facade() {
        let bus = EventBus::new();
        bus.register_hierarchy("chart.style_changed", ["chart.style_changed", "chart.updated"])
            .expect("register");
        assert_eq!(
            &*bus.resolve_hierarchy("chart.style_changed"),
            ["chart.style_changed", "chart.updated"]
        );
        assert!(bus.register_hierarchy("chart.updated", ["chart.changed"]).is_err());
    }

    #[test]
    fn test_clear_all_subscriptions() {
        let bus = EventBus::new();
        bus.subscribe("a.b", |_| {}).expect("subscribe");
        bus.subscribe("a.*", |_| {}).expect("subscribe");
        bus.clear_all_subscriptions();
        assert_eq!(bus.subscribers_count(None), 0);
    }

    #[test]
    fn test_debug_output() {
        let bus = EventBus::new();
        let text = format!("{:?}", bus);
        assert!(text.contains("subscribers: 0"));
        assert!(text.contains("trace_dispatch: false"));
    }
}
