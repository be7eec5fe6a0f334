//! Subscription registry.
//!
//! Holds exact-match subscriptions keyed by event type and wildcard
//! subscriptions in insertion order. All access goes through one lock which
//! is released before any handler runs; dispatch works on a snapshot.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::matcher::{is_wildcard, WildcardPattern};
use crate::error::EventBusError;
use crate::payload::Payload;

/// Subscription handle identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

type HandlerFn = dyn Fn(&Payload) -> anyhow::Result<()> + Send + Sync;

/// A shareable event callback.
///
/// Handler identity is pointer identity: clones of one `EventHandler` are
/// the same handler for the purpose of `unsubscribe`, separately built
/// handlers never are, even when wrapping the same function.
#[derive(Clone)]
pub struct EventHandler {
    inner: Arc<HandlerFn>,
}

impl EventHandler {
    /// Wrap an infallible callback
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(move |payload: &Payload| {
                handler(payload);
                Ok(())
            }),
        }
    }

    /// Wrap a callback that may report failure
    pub fn fallible<F>(handler: F) -> Self
    where
        F: Fn(&Payload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(handler),
        }
    }

    /// Whether `other` is the same handler
    pub fn same_as(&self, other: &EventHandler) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn call(&self, payload: &Payload) -> anyhow::Result<()> {
        (self.inner)(payload)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for EventHandler {}

impl std::fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventHandler({:p})", Arc::as_ptr(&self.inner) as *const ())
    }
}

/// One registered subscription
#[derive(Debug, Clone)]
pub struct Subscription {
    id: SubscriptionId,
    pattern: Arc<str>,
    handler: EventHandler,
    component_id: Option<Arc<str>>,
}

impl Subscription {
    /// Unique id of this subscription
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Pattern the subscription was registered with
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The subscribed handler
    pub fn handler(&self) -> &EventHandler {
        &self.handler
    }

    /// Owning component, if registered through an adapter
    pub fn component_id(&self) -> Option<&str> {
        self.component_id.as_deref()
    }
}

/// Returned by `subscribe`; identifies exactly one registry entry
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    pattern: Arc<str>,
    handler: EventHandler,
}

impl SubscriptionHandle {
    /// Unique id of the subscription
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Pattern the subscription was registered with
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The subscribed handler
    pub fn handler(&self) -> &EventHandler {
        &self.handler
    }
}

#[derive(Debug, Default)]
struct Subscriptions {
    exact: HashMap<String, Vec<Subscription>>,
    wildcard: Vec<(WildcardPattern, Subscription)>,
}

/// Thread-safe store of all subscriptions
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    inner: RwLock<Subscriptions>,
}

impl SubscriptionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a pattern.
    ///
    /// Registering the same pattern and handler twice creates two entries.
    pub fn subscribe(
        &self,
        pattern: &str,
        handler: EventHandler,
        component_id: Option<&str>,
    ) -> Result<SubscriptionHandle, EventBusError> {
        if pattern.is_empty() {
            return Err(EventBusError::EmptyPattern);
        }

        let compiled = if is_wildcard(pattern) {
            Some(WildcardPattern::compile(pattern)?)
        } else {
            None
        };

        let subscription = Subscription {
            id: SubscriptionId::new(),
            pattern: Arc::from(pattern),
            handler,
            component_id: component_id.map(Arc::from),
        };
        let handle = SubscriptionHandle {
            id: subscription.id,
            pattern: Arc::clone(&subscription.pattern),
            handler: subscription.handler.clone(),
        };

        let mut inner = self.inner.write();
        match compiled {
            Some(compiled) => inner.wildcard.push((compiled, subscription)),
            None => inner
                .exact
                .entry(pattern.to_string())
                .or_default()
                .push(subscription),
        }
        drop(inner);

        tracing::debug!("Subscription {} added for '{}'", handle.id, pattern);
        Ok(handle)
    }

    /// Remove the first entry registered with this pattern and handler.
    ///
    /// Returns true if an entry was removed.
    pub fn unsubscribe(&self, pattern: &str, handler: &EventHandler) -> bool {
        let mut inner = self.inner.write();
        let removed = if is_wildcard(pattern) {
            let index = inner.wildcard.iter().position(|(compiled, sub)| {
                compiled.as_str() == pattern && sub.handler.same_as(handler)
            });
            index.map(|index| inner.wildcard.remove(index).1)
        } else {
            remove_exact(&mut inner.exact, pattern, |sub| sub.handler.same_as(handler))
        };
        drop(inner);

        if let Some(sub) = &removed {
            tracing::debug!("Subscription {} removed from '{}'", sub.id, pattern);
        }
        removed.is_some()
    }

    /// Remove the entry with this id.
    ///
    /// Returns true if an entry was removed.
    pub fn unsubscribe_by_id(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.write();
        let exact_key = inner
            .exact
            .iter()
            .find(|(_, subs)| subs.iter().any(|sub| sub.id == id))
            .map(|(key, _)| key.clone());

        let removed = match exact_key {
            Some(key) => remove_exact(&mut inner.exact, &key, |sub| sub.id == id).is_some(),
            None => match inner.wildcard.iter().position(|(_, sub)| sub.id == id) {
                Some(index) => {
                    inner.wildcard.remove(index);
                    true
                }
                None => false,
            },
        };
        drop(inner);

        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Copy of every subscription that should receive `event_type`.
    ///
    /// Exact subscribers come first, then wildcard subscribers, each group
    /// in subscription order. The returned list is detached from the
    /// registry.
    pub fn snapshot(&self, event_type: &str) -> Vec<Subscription> {
        let inner = self.inner.read();
        let mut subscribers: Vec<Subscription> =
            inner.exact.get(event_type).cloned().unwrap_or_default();
        subscribers.extend(
            inner
                .wildcard
                .iter()
                .filter(|(compiled, _)| compiled.matches(event_type))
                .map(|(_, sub)| sub.clone()),
        );
        subscribers
    }

    /// Number of subscriptions registered with `pattern`, or in total
    pub fn count(&self, pattern: Option<&str>) -> usize {
        let inner = self.inner.read();
        match pattern {
            None => inner.exact.values().map(Vec::len).sum::<usize>() + inner.wildcard.len(),
            Some(pattern) if is_wildcard(pattern) => inner
                .wildcard
                .iter()
                .filter(|(compiled, _)| compiled.as_str() == pattern)
                .count(),
            Some(pattern) => inner.exact.get(pattern).map_or(0, Vec::len),
        }
    }

    /// Drop every subscription
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.exact.clear();
        inner.wildcard.clear();
    }
}

fn remove_exact(
    exact: &mut HashMap<String, Vec<Subscription>>,
    pattern: &str,
    predicate: impl Fn(&Subscription) -> bool,
) -> Option<Subscription> {
    let subs = exact.get_mut(pattern)?;
    let index = subs.iter().position(predicate)?;
    let removed = subs.remove(index);
    if subs.is_empty() {
        exact.remove(pattern);
    }
    Some(removed)
}
