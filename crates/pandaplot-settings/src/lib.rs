//! Pandaplot Settings Crate
//!
//! Handles application configuration: event bus options, hierarchy
//! extensions declared in the config file, and logging preferences.

pub mod config;
pub mod error;

pub use config::{default_config_path, Config, EventBusSettings, LogLevel, LoggingSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
