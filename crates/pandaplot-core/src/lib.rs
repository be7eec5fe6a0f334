//! # Pandaplot Core
//!
//! Core plumbing shared by every pandaplot panel: the in-process event bus,
//! the event payload type and the catalogue of well-known event types.
//!
//! Panels never talk to each other directly. They publish named events and
//! subscribe to the events they care about, optionally by wildcard pattern.
//! The bus expands each published event into its hierarchy of more generic
//! events so that broad listeners (`dataset.changed`) and narrow listeners
//! (`dataset.column_added`) are both served by one publish call.

pub mod error;
pub mod event_bus;
pub mod payload;

pub use error::{Error, EventBusError, HandlerError, Result};

pub use event_bus::{
    events, scope_pattern, DispatchReport, Dispatcher, EventBus, EventBusConfig, EventComponent,
    EventHandler, EventHierarchy, EventPublisher, EventSubscriber, HierarchyChain, Subscription,
    SubscriptionHandle, SubscriptionId, SubscriptionRegistry, WildcardPattern,
};

pub use payload::Payload;
