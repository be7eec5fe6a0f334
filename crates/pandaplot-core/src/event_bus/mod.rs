//! # Event Bus Module
//!
//! Provides the in-process event bus used for decoupled communication
//! between panels, tabs and views.
//!
//! ## Overview
//!
//! - Publishers emit named events (`dataset.column_added`) with a
//!   [`Payload`](crate::Payload) without knowing who listens
//! - Subscribers register for an exact event type or a wildcard pattern
//!   (`dataset.*`)
//! - Each emit fans out over the event's hierarchy, specific to generic, so
//!   `dataset.column_added` also reaches `dataset.structure_changed` and
//!   `dataset.changed` listeners
//! - A failing or panicking handler is logged and skipped; everybody else
//!   still gets the event
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use pandaplot_core::{payload, EventBus, EventSubscriber, EventHandler};
//!
//! let bus = Arc::new(EventBus::new());
//!
//! let panel = EventSubscriber::new(Arc::clone(&bus), "ChartPanel");
//! panel
//!     .subscribe_to_scope("dataset", EventHandler::new(|event| {
//!         assert_eq!(event.original_event(), Some("dataset.column_added"));
//!     }))
//!     .unwrap();
//!
//! bus.emit("dataset.column_added", payload! { "dataset_id" => "d1" });
//!
//! // Release everything the panel subscribed
//! panel.unsubscribe_all();
//! ```

mod adapters;
mod bus;
mod dispatch;
pub mod events;
mod hierarchy;
pub mod matcher;
mod registry;

pub use adapters::{scope_pattern, EventComponent, EventPublisher, EventSubscriber};
pub use bus::{EventBus, EventBusConfig};
pub use dispatch::{DispatchReport, Dispatcher};
pub use hierarchy::{EventHierarchy, HierarchyChain};
pub use matcher::WildcardPattern;
pub use registry::{
    EventHandler, Subscription, SubscriptionHandle, SubscriptionId, SubscriptionRegistry,
};
