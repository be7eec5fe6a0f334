//! Event dispatch.
//!
//! Runs one emit across its hierarchy chain. Each level gets its own copy of
//! the payload and its own registry snapshot; handlers are called with no
//! lock held, so they are free to subscribe, unsubscribe or emit again.

use chrono::{SecondsFormat, Utc};
use std::panic::{self, AssertUnwindSafe};

use super::hierarchy::EventHierarchy;
use super::registry::{Subscription, SubscriptionRegistry};
use crate::error::HandlerError;
use crate::payload::{keys, Payload};

/// Outcome counters for one dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Hierarchy levels dispatched.
    pub levels: usize,
    /// Handlers that completed normally.
    pub delivered: usize,
    /// Handlers that returned an error or panicked.
    pub failed: usize,
}

impl DispatchReport {
    fn absorb(&mut self, other: DispatchReport) {
        self.levels += other.levels;
        self.delivered += other.delivered;
        self.failed += other.failed;
    }
}

/// Delivers events to the subscribers held in a registry
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a SubscriptionRegistry,
    hierarchy: &'a EventHierarchy,
    trace_dispatch: bool,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher over a registry and hierarchy
    pub fn new(registry: &'a SubscriptionRegistry, hierarchy: &'a EventHierarchy) -> Self {
        Self {
            registry,
            hierarchy,
            trace_dispatch: false,
        }
    }

    /// Log every dispatched level at trace level
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.trace_dispatch = enabled;
        self
    }

    /// Emit `event_type` and every level of its hierarchy, specific first.
    ///
    /// Every level sees `original_event == event_type` and the same
    /// `timestamp`.
    pub fn emit(&self, event_type: &str, data: Payload) -> DispatchReport {
        let mut base = data;
        base.stamp(
            keys::TIMESTAMP,
            &Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        );

        let chain = self.hierarchy.resolve(event_type);
        let mut report = DispatchReport::default();
        for level in chain.iter() {
            let mut payload = base.clone();
            payload.stamp(keys::ORIGINAL_EVENT, event_type);
            report.absorb(self.dispatch_level(level, payload));
        }
        report
    }

    /// Deliver a payload to the subscribers of one level.
    ///
    /// A failing handler is logged and skipped; the rest still run.
    pub fn dispatch_level(&self, level: &str, mut payload: Payload) -> DispatchReport {
        payload.stamp(keys::EVENT_TYPE, level);

        let subscribers = self.registry.snapshot(level);
        if self.trace_dispatch {
            tracing::trace!(
                "Dispatching {} (original {}) to {} subscriber(s)",
                level,
                payload.original_event().unwrap_or(level),
                subscribers.len()
            );
        }

        let mut report = DispatchReport {
            levels: 1,
            ..Default::default()
        };
        for subscription in &subscribers {
            match invoke(subscription, &payload) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    report.failed += 1;
                    log_failure(level, subscription, &err);
                }
            }
        }
        report
    }
}

fn invoke(subscription: &Subscription, payload: &Payload) -> Result<(), HandlerError> {
    match panic::catch_unwind(AssertUnwindSafe(|| subscription.handler().call(payload))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(HandlerError::Failed(err)),
        Err(panic) => Err(HandlerError::from_panic(panic)),
    }
}

fn log_failure(level: &str, subscription: &Subscription, err: &HandlerError) {
    let component = subscription.component_id().unwrap_or("-");
    if err.is_panic() {
        tracing::error!(
            "Event handler {} ({}, pattern '{}') panicked on {}: {}",
            subscription.id(),
            component,
            subscription.pattern(),
            level,
            err
        );
    } else {
        tracing::warn!(
            "Event handler {} ({}, pattern '{}') failed on {}: {}",
            subscription.id(),
            component,
            subscription.pattern(),
            level,
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::registry::EventHandler;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<Payload>>>, EventHandler) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler = EventHandler::new(move |payload| sink.lock().push(payload.clone()));
        (seen, handler)
    }

    #[test]
    fn test_dispatch_level_stamps_event_type() {
        let registry = SubscriptionRegistry::new();
        let hierarchy = EventHierarchy::new();
        let (seen, handler) = recorder();
        registry
            .subscribe("dataset.changed", handler, None)
            .expect("subscribe");

        let payload = crate::payload! { "event_type" => "caller value", "dataset_id" => "d1" };
        let report = Dispatcher::new(&registry, &hierarchy).dispatch_level("dataset.changed", payload);

        assert_eq!(
            report,
            DispatchReport {
                levels: 1,
                delivered: 1,
                failed: 0
            }
        );
        let seen = seen.lock();
        assert_eq!(seen[0].event_type(), Some("dataset.changed"));
        assert_eq!(seen[0].get_str("dataset_id"), Some("d1"));
    }

    #[test]
    fn test_emit_walks_chain_with_shared_timestamp() {
        let registry = SubscriptionRegistry::new();
        let hierarchy = EventHierarchy::new();
        hierarchy
            .register("note.created", ["note.created", "project.item_added", "project.changed"])
            .expect("register");
        let (seen, handler) = recorder();
        registry.subscribe("*", handler, None).expect("subscribe");

        let report = Dispatcher::new(&registry, &hierarchy).emit("note.created", Payload::new());
        assert_eq!(report.levels, 3);
        assert_eq!(report.delivered, 3);

        let seen = seen.lock();
        let levels: Vec<_> = seen.iter().map(|p| p.event_type().unwrap_or_default()).collect();
        assert_eq!(levels, ["note.created", "project.item_added", "project.changed"]);
        assert!(seen.iter().all(|p| p.original_event() == Some("note.created")));
        assert!(seen[0].timestamp().is_some());
        assert!(seen.iter().all(|p| p.timestamp() == seen[0].timestamp()));
    }

    #[test]
    fn test_failures_are_counted_and_skipped() {
        let registry = SubscriptionRegistry::new();
        let hierarchy = EventHierarchy::new();
        registry
            .subscribe(
                "fit.failed",
                EventHandler::fallible(|_| Err(anyhow::anyhow!("no convergence"))),
                Some("FitPanel"),
            )
            .expect("subscribe");
        registry
            .subscribe("fit.failed", EventHandler::new(|_| panic!("boom")), None)
            .expect("subscribe");
        let (seen, handler) = recorder();
        registry.subscribe("fit.*", handler, None).expect("subscribe");

        let report = Dispatcher::new(&registry, &hierarchy)
            .with_tracing(true)
            .emit("fit.failed", Payload::new());
        assert_eq!(report.failed, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(seen.lock().len(), 1);
    }
}
