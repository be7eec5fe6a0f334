//! Event hierarchy resolution.
//!
//! Maps a specific event type to the chain of levels a single emit fans out
//! to, ordered specific to generic. Unmapped types resolve to themselves.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::events::default_hierarchy;
use crate::error::EventBusError;

/// Ordered chain of event types, specific first.
pub type HierarchyChain = Arc<[String]>;

/// Runtime-extensible table of event hierarchies
#[derive(Debug, Default)]
pub struct EventHierarchy {
    chains: RwLock<HashMap<String, HierarchyChain>>,
}

impl EventHierarchy {
    /// Create an empty hierarchy where every type resolves to itself
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hierarchy pre-populated with the application table
    pub fn with_defaults() -> Self {
        let chains = default_hierarchy()
            .into_iter()
            .map(|(event, chain)| {
                let chain: HierarchyChain = chain.into_iter().map(str::to_string).collect();
                (event.to_string(), chain)
            })
            .collect();
        Self {
            chains: RwLock::new(chains),
        }
    }

    /// Resolve the dispatch chain for an event type.
    ///
    /// Always non-empty and always starts with `event_type`.
    pub fn resolve(&self, event_type: &str) -> HierarchyChain {
        if let Some(chain) = self.chains.read().get(event_type) {
            return Arc::clone(chain);
        }
        Arc::from([event_type.to_string()])
    }

    /// Register or replace the chain for an event type.
    ///
    /// An empty chain registers the event as mapping only to itself. A
    /// non-empty chain must start with `event_type` and contain no empty
    /// entries.
    pub fn register<I, S>(&self, event_type: &str, chain: I) -> Result<(), EventBusError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if event_type.is_empty() {
            return Err(EventBusError::EmptyEventType);
        }

        let mut levels: Vec<String> = chain.into_iter().map(Into::into).collect();
        if levels.is_empty() {
            levels.push(event_type.to_string());
        }
        if levels[0] != event_type {
            return Err(EventBusError::InvalidHierarchy {
                event_type: event_type.to_string(),
                reason: format!("chain starts with '{}' instead of the event type", levels[0]),
            });
        }
        if levels.iter().any(String::is_empty) {
            return Err(EventBusError::InvalidHierarchy {
                event_type: event_type.to_string(),
                reason: "chain contains an empty event type".to_string(),
            });
        }

        tracing::debug!("Hierarchy for {} set to {:?}", event_type, levels);
        self.chains
            .write()
            .insert(event_type.to_string(), levels.into());
        Ok(())
    }

    /// Remove the chain for an event type, returning whether one existed
    pub fn unregister(&self, event_type: &str) -> bool {
        self.chains.write().remove(event_type).is_some()
    }

    /// Whether an explicit chain is registered for the event type
    pub fn contains(&self, event_type: &str) -> bool {
        self.chains.read().contains_key(event_type)
    }

    /// Number of registered chains
    pub fn len(&self) -> usize {
        self.chains.read().len()
    }

    /// Whether no chains are registered
    pub fn is_empty(&self) -> bool {
        self.chains.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_type_resolves_to_itself() {
        let hierarchy = EventHierarchy::new();
        assert_eq!(&*hierarchy.resolve("ui.tab_changed"), ["ui.tab_changed"]);
        assert!(hierarchy.is_empty());
    }

    #[test]
    fn test_defaults_are_loaded() {
        let hierarchy = EventHierarchy::with_defaults();
        assert!(hierarchy.contains("dataset.column_added"));
        assert_eq!(
            &*hierarchy.resolve("dataset.column_added"),
            [
                "dataset.column_added",
                "dataset.structure_changed",
                "dataset.changed"
            ]
        );
        assert_eq!(
            &*hierarchy.resolve("analysis.completed"),
            [
                "analysis.completed",
                "dataset.column_added",
                "dataset.structure_changed",
                "dataset.changed"
            ]
        );
    }

    #[test]
    fn test_register_and_replace() {
        let hierarchy = EventHierarchy::with_defaults();
        hierarchy
            .register("chart.data_updated", ["chart.data_updated", "chart.updated"])
            .expect("register");
        assert_eq!(
            &*hierarchy.resolve("chart.data_updated"),
            ["chart.data_updated", "chart.updated"]
        );

        hierarchy
            .register("chart.data_updated", Vec::<String>::new())
            .expect("register singleton");
        assert_eq!(
            &*hierarchy.resolve("chart.data_updated"),
            ["chart.data_updated"]
        );
    }

    #[test]
    fn test_register_rejects_malformed_chains() {
        let hierarchy = EventHierarchy::new();
        assert_eq!(
            hierarchy.register("", ["x"]),
            Err(EventBusError::EmptyEventType)
        );
        assert!(matches!(
            hierarchy.register("fit.applied", ["dataset.changed", "fit.applied"]),
            Err(EventBusError::InvalidHierarchy { .. })
        ));
        assert!(matches!(
            hierarchy.register("fit.applied", ["fit.applied", ""]),
            Err(EventBusError::InvalidHierarchy { .. })
        ));
        assert!(!hierarchy.contains("fit.applied"));
    }

    #[test]
    fn test_resolved_chain_survives_replacement() {
        let hierarchy = EventHierarchy::new();
        hierarchy
            .register("note.moved", ["note.moved", "project.changed"])
            .expect("register");
        let in_flight = hierarchy.resolve("note.moved");

        assert!(hierarchy.unregister("note.moved"));
        assert!(!hierarchy.unregister("note.moved"));
        assert_eq!(&*in_flight, ["note.moved", "project.changed"]);
        assert_eq!(&*hierarchy.resolve("note.moved"), ["note.moved"]);
    }
}
