//! Application context.
//!
//! Built once at startup and passed by reference to every panel
//! constructor. It owns the only event bus in the process.

use pandaplot_core::{events, EventBus, Payload};
use pandaplot_settings::Config;
use std::sync::Arc;

/// Shared application state handed to components
#[derive(Debug)]
pub struct AppContext {
    bus: Arc<EventBus>,
    config: Config,
}

impl AppContext {
    /// Build the context and its event bus from configuration
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let bus = Arc::new(config.build_event_bus()?);
        tracing::info!(
            "Event bus ready with {} hierarchy chain(s)",
            bus.hierarchy().len()
        );
        Ok(Self { bus, config })
    }

    /// The application event bus
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Announce shutdown and drop any subscriptions still registered.
    ///
    /// Panels should have released their own subscriptions by now; anything
    /// left over is logged.
    pub fn shutdown(self) {
        self.bus.emit(events::app::CLOSING, Payload::new());

        let leftover = self.bus.subscribers_count(None);
        if leftover > 0 {
            tracing::warn!("{} subscription(s) still registered at shutdown", leftover);
        }
        self.bus.clear_all_subscriptions();
        tracing::info!("Application context shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builds_bus_from_config() {
        let mut config = Config::new();
        config.event_bus.hierarchy.insert(
            "plugin.loaded".to_string(),
            vec!["plugin.loaded".to_string(), "app.changed".to_string()],
        );

        let ctx = AppContext::new(config).expect("context");
        assert_eq!(
            &*ctx.event_bus().resolve_hierarchy("plugin.loaded"),
            ["plugin.loaded", "app.changed"]
        );
        assert!(ctx.config().event_bus.load_default_hierarchy);
    }

    #[test]
    fn test_shutdown_clears_subscriptions() {
        let ctx = AppContext::new(Config::new()).expect("context");
        let bus = Arc::clone(ctx.event_bus());
        bus.subscribe("app.closing", |_| {}).expect("subscribe");

        ctx.shutdown();
        assert_eq!(bus.subscribers_count(None), 0);
    }
}
