//! Error types for the settings crate.
//!
//! This module provides structured error types for loading, saving and
//! validating the configuration file.

use std::io;
use thiserror::Error;

use pandaplot_core::EventBusError;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// A configuration validation error occurred.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The event bus rejected a configured value.
    #[error("Event bus error: {0}")]
    EventBus(#[from] EventBusError),
}

/// Errors related to configuration validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file format is not supported.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A configured hierarchy chain is malformed.
    #[error("Invalid hierarchy for '{event_type}': {reason}")]
    InvalidHierarchy { event_type: String, reason: String },

    /// No platform configuration directory could be determined.
    #[error("Config directory unavailable")]
    NoConfigDirectory,
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnsupportedFormat("yaml".to_string());
        assert_eq!(err.to_string(), "Unsupported config format: yaml");

        let err = ConfigError::InvalidHierarchy {
            event_type: "chart.updated".to_string(),
            reason: "chain is empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid hierarchy for 'chart.updated': chain is empty"
        );
    }

    #[test]
    fn test_settings_error_from_conversions() {
        let err: SettingsError = ConfigError::NoConfigDirectory.into();
        assert_eq!(err.to_string(), "Config error: Config directory unavailable");

        let err: SettingsError = EventBusError::EmptyEventType.into();
        assert_eq!(err.to_string(), "Event bus error: Event type must not be empty");

        let err: SettingsError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, SettingsError::IoError(_)));
    }
}
