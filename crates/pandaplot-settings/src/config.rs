//! Configuration and settings management for pandaplot
//!
//! Configuration is organized into two sections:
//! - Event bus options and extra hierarchy chains declared by plugins or
//!   site configuration
//! - Logging preferences
//!
//! Files may be JSON or TOML; the format follows the file extension.

use pandaplot_core::{EventBus, EventBusConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsResult};

/// Event bus settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBusSettings {
    /// Start from the built-in hierarchy table
    pub load_default_hierarchy: bool,
    /// Trace every dispatched level
    pub trace_dispatch: bool,
    /// Extra chains, event type to levels (specific first)
    pub hierarchy: BTreeMap<String, Vec<String>>,
}

impl Default for EventBusSettings {
    fn default() -> Self {
        Self {
            load_default_hierarchy: true,
            trace_dispatch: false,
            hierarchy: BTreeMap::new(),
        }
    }
}

impl EventBusSettings {
    /// Bus construction options
    pub fn to_bus_config(&self) -> EventBusConfig {
        EventBusConfig {
            load_default_hierarchy: self.load_default_hierarchy,
            trace_dispatch: self.trace_dispatch,
        }
    }
}

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set
    pub level: LogLevel,
    /// Log file; stdout when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event bus settings
    pub event_bus: EventBusSettings,
    /// Logging preferences
    pub logging: LoggingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (event_type, chain) in &self.event_bus.hierarchy {
            let invalid = |reason: &str| ConfigError::InvalidHierarchy {
                event_type: event_type.clone(),
                reason: reason.to_string(),
            };

            if event_type.is_empty() {
                return Err(invalid("event type is empty"));
            }
            if chain.iter().any(String::is_empty) {
                return Err(invalid("chain contains an empty event type"));
            }
            if chain.first().is_some_and(|first| first != event_type) {
                return Err(invalid("chain must start with the event type"));
            }
        }
        Ok(())
    }

    /// Build an event bus with these settings applied
    pub fn build_event_bus(&self) -> SettingsResult<EventBus> {
        let bus = EventBus::with_config(self.event_bus.to_bus_config());
        self.apply_to(&bus)?;
        Ok(bus)
    }

    /// Register the configured hierarchy chains on a bus.
    ///
    /// Returns the number of chains registered.
    pub fn apply_to(&self, bus: &EventBus) -> SettingsResult<usize> {
        self.validate()?;
        for (event_type, chain) in &self.event_bus.hierarchy {
            bus.register_hierarchy(event_type, chain.iter().cloned())?;
        }
        Ok(self.event_bus.hierarchy.len())
    }
}

/// Default location of the config file in the platform config directory
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDirectory)?;
    Ok(dir.join("pandaplot").join("config.toml"))
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
