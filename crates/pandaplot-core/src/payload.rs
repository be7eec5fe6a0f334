//! Event payloads.
//!
//! A payload is an open string-keyed map of JSON values. The bus reserves a
//! handful of keys (see [`keys`]) and overwrites them on every dispatch
//! level; domain data must use other names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved payload keys managed by the event bus
pub mod keys {
    /// Hierarchy level currently being dispatched.
    pub const EVENT_TYPE: &str = "event_type";
    /// Event type the publisher actually emitted.
    pub const ORIGINAL_EVENT: &str = "original_event";
    /// Emission time, RFC 3339 UTC.
    pub const TIMESTAMP: &str = "timestamp";
    /// Identifier of the publishing component.
    pub const SOURCE_COMPONENT: &str = "source_component";

    /// All keys the bus writes.
    pub const RESERVED: [&str; 4] = [EVENT_TYPE, ORIGINAL_EVENT, TIMESTAMP, SOURCE_COMPONENT];

    /// Check whether `key` is written by the bus
    pub fn is_reserved(key: &str) -> bool {
        RESERVED.contains(&key)
    }
}

/// Key/value data carried by an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value for the key if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string value by key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Remove a value by key
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Check whether the payload has a key
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all entries, reserved keys included
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Copy of this payload with every bus-managed key stripped.
    ///
    /// Handlers that derive new data from an event and re-publish it should
    /// start from this rather than from the payload they received.
    pub fn domain_data(&self) -> Payload {
        self.0
            .iter()
            .filter(|(key, _)| !keys::is_reserved(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Hierarchy level being dispatched
    pub fn event_type(&self) -> Option<&str> {
        self.get_str(keys::EVENT_TYPE)
    }

    /// Event type passed to `emit`
    pub fn original_event(&self) -> Option<&str> {
        self.get_str(keys::ORIGINAL_EVENT)
    }

    /// Publishing component, present when published through an adapter
    pub fn source_component(&self) -> Option<&str> {
        self.get_str(keys::SOURCE_COMPONENT)
    }

    /// Emission time
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.get_str(keys::TIMESTAMP)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Overwrite a bus-managed key
    pub(crate) fn stamp(&mut self, key: &'static str, value: &str) {
        self.0.insert(key.to_string(), Value::String(value.to_string()));
    }

    /// Consume into the underlying JSON map
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Payload {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Build a [`Payload`] from `key => value` pairs
///
/// ```rust
/// use pandaplot_core::payload;
///
/// let data = payload! { "dataset_id" => "d1", "row_count" => 3 };
/// assert_eq!(data.get_str("dataset_id"), Some("d1"));
/// ```
#[macro_export]
macro_rules! payload {
    () => {
        $crate::Payload::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut payload = $crate::Payload::new();
        $( payload.insert($key, $value); )+
        payload
    }};
}
