//! Subscription pattern matching.
//!
//! `*` stands for zero or more arbitrary characters, including dots, so
//! `dataset.*` covers `dataset.column_added` as well as
//! `dataset.column.added.extra`. Every other character is literal and the
//! whole event type must match.

use regex::Regex;

use crate::error::EventBusError;

/// Wildcard character recognised in subscription patterns.
pub const WILDCARD: char = '*';

/// Whether a pattern contains a wildcard
pub fn is_wildcard(pattern: &str) -> bool {
    pattern.contains(WILDCARD)
}

/// A compiled wildcard pattern
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    /// Compile a pattern containing one or more `*`
    pub fn compile(pattern: &str) -> Result<Self, EventBusError> {
        if pattern.is_empty() {
            return Err(EventBusError::EmptyPattern);
        }

        let body = pattern
            .split(WILDCARD)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("^(?s:{})$", body)).map_err(|e| {
            EventBusError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written by the subscriber
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check if an event type matches this pattern
    pub fn matches(&self, event_type: &str) -> bool {
        self.regex.is_match(event_type)
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for WildcardPattern {}

impl std::fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Check whether `pattern` matches `event_type`.
///
/// Patterns without a wildcard compare by string equality. A pattern that
/// cannot be compiled matches nothing.
pub fn matches(event_type: &str, pattern: &str) -> bool {
    if !is_wildcard(pattern) {
        return event_type == pattern;
    }
    WildcardPattern::compile(pattern).is_ok_and(|compiled| compiled.matches(event_type))
}
