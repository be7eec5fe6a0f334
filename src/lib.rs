//! # Pandaplot
//!
//! A desktop data-visualization tool. Panels, tabs and views never call
//! each other; they talk through one in-process event bus built at startup
//! and handed to every component through the [`AppContext`].
//!
//! ## Architecture
//!
//! Pandaplot is organized as a workspace with multiple crates:
//!
//! 1. **pandaplot-core** - Event bus, payloads, event catalogue
//! 2. **pandaplot-settings** - Configuration files and validation
//! 3. **pandaplot** - Application shell: logging, context, panels, binary

pub mod context;
pub mod panels;

pub use context::AppContext;
pub use panels::{AnalysisPanel, ChartPanel, DatasetPanel};

pub use pandaplot_core::{
    events, payload, EventBus, EventComponent, EventHandler, EventPublisher, EventSubscriber,
    Payload,
};
pub use pandaplot_settings::{Config, LoggingSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging from the logging settings
///
/// Sets up structured logging with:
/// - `RUST_LOG` environment variable support, falling back to the
///   configured level
/// - Pretty console output, or plain output appended to the configured file
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));

    match &settings.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", path.display(), e))?;

            let fmt_layer = fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        None => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
