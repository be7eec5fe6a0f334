use pandaplot::{payload, AppContext, ChartPanel, Config, DatasetPanel, EventHandler, EventSubscriber};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

const CONFIG: &str = r#"
[event_bus]
trace_dispatch = true

[event_bus.hierarchy]
"chart.data_updated" = ["chart.data_updated", "chart.updated"]

[logging]
level = "debug"
"#;

#[test]
fn test_context_from_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let config = Config::load_from_file(&path).unwrap();
    let ctx = AppContext::new(config).unwrap();
    let bus = Arc::clone(ctx.event_bus());

    assert!(bus.config().trace_dispatch);
    assert_eq!(
        &*bus.resolve_hierarchy("chart.data_updated"),
        ["chart.data_updated", "chart.updated"]
    );

    let updates = Arc::new(AtomicUsize::new(0));
    let u = Arc::clone(&updates);
    let listener = EventSubscriber::new(Arc::clone(&bus), "Legend");
    listener
        .subscribe_to_event(
            "chart.updated",
            EventHandler::new(move |_| {
                u.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

    bus.emit("chart.data_updated", payload! { "chart_id" => "c1" });
    assert_eq!(updates.load(Ordering::SeqCst), 1);

    drop(listener);
    ctx.shutdown();
    assert_eq!(bus.subscribers_count(None), 0);
}

#[test]
fn test_panel_failure_is_isolated_from_other_panels() {
    let ctx = AppContext::new(Config::default()).unwrap();
    let bus = Arc::clone(ctx.event_bus());
    bus.subscribe("dataset.changed", |_| panic!("broken legend"))
        .unwrap();

    let mut dataset = DatasetPanel::new(&ctx, "d1");
    let chart = ChartPanel::new(&ctx).unwrap();
    dataset.add_column("pressure");

    assert_eq!(chart.redraw_count(), 1);
    chart.close();
    ctx.shutdown();
}
