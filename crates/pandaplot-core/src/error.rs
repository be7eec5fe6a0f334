//! Error handling for pandaplot core
//!
//! Two families of errors live here:
//! - [`EventBusError`] reports misuse of the bus API (bad patterns, malformed
//!   hierarchy chains). These indicate programming mistakes and are returned
//!   at call time.
//! - [`HandlerError`] describes a subscriber that failed during dispatch. It
//!   never reaches the publisher; the dispatcher logs it and moves on.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Event bus misuse error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventBusError {
    /// Subscription pattern was the empty string
    #[error("Subscription pattern must not be empty")]
    EmptyPattern,

    /// Wildcard pattern could not be compiled
    #[error("Invalid subscription pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as given by the caller.
        pattern: String,
        /// Why compilation failed.
        reason: String,
    },

    /// Event type was the empty string
    #[error("Event type must not be empty")]
    EmptyEventType,

    /// Hierarchy chain does not satisfy the chain invariants
    #[error("Invalid hierarchy for '{event_type}': {reason}")]
    InvalidHierarchy {
        /// The event type the chain was registered for.
        event_type: String,
        /// Which invariant was violated.
        reason: String,
    },
}

/// Failure raised by a single subscriber during dispatch
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler returned an error
    #[error("handler returned an error: {0:#}")]
    Failed(#[from] anyhow::Error),

    /// Handler panicked
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Build a [`HandlerError::Panicked`] from a `catch_unwind` payload
    pub fn from_panic(panic: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = panic.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        HandlerError::Panicked(message)
    }

    /// Check if the handler panicked rather than returning an error
    pub fn is_panic(&self) -> bool {
        matches!(self, HandlerError::Panicked(_))
    }
}

/// Main error type for pandaplot core
#[derive(Error, Debug)]
pub enum Error {
    /// Event bus misuse
    #[error(transparent)]
    EventBus(#[from] EventBusError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an event bus misuse error
    pub fn is_event_bus_error(&self) -> bool {
        matches!(self, Error::EventBus(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
