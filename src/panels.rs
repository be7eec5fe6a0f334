//! Application panels.
//!
//! Rendering lives in the UI layer; these types hold the event wiring of
//! the dataset table, the chart view and the analysis sidebar.

use pandaplot_core::{events, payload, EventComponent, EventHandler, EventPublisher, EventSubscriber};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::context::AppContext;

/// Dataset table: publishes structural edits
#[derive(Debug)]
pub struct DatasetPanel {
    events: EventPublisher,
    dataset_id: String,
    columns: Vec<String>,
}

impl DatasetPanel {
    pub fn new(ctx: &AppContext, dataset_id: impl Into<String>) -> Self {
        Self {
            events: EventPublisher::new(Arc::clone(ctx.event_bus()), "DatasetPanel"),
            dataset_id: dataset_id.into(),
            columns: Vec::new(),
        }
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Append a column and announce it
    pub fn add_column(&mut self, name: &str) {
        self.columns.push(name.to_string());
        self.events.publish_event(
            events::dataset::COLUMN_ADDED,
            payload! {
                "dataset_id" => self.dataset_id.as_str(),
                "column_name" => name,
                "column_count" => self.columns.len(),
            },
        );
    }

    /// Remove a column if present and announce it
    pub fn remove_column(&mut self, name: &str) -> bool {
        let Some(index) = self.columns.iter().position(|c| c == name) else {
            return false;
        };
        self.columns.remove(index);
        self.events.publish_event(
            events::dataset::COLUMN_REMOVED,
            payload! {
                "dataset_id" => self.dataset_id.as_str(),
                "column_name" => name,
                "column_count" => self.columns.len(),
            },
        );
        true
    }
}

/// Chart view: redraws on any dataset change
#[derive(Debug)]
pub struct ChartPanel {
    events: EventSubscriber,
    redraws: Arc<AtomicUsize>,
    last_cause: Arc<Mutex<Option<String>>>,
}

impl ChartPanel {
    pub fn new(ctx: &AppContext) -> anyhow::Result<Self> {
        let panel = Self {
            events: EventSubscriber::new(Arc::clone(ctx.event_bus()), "ChartPanel"),
            redraws: Arc::new(AtomicUsize::new(0)),
            last_cause: Arc::new(Mutex::new(None)),
        };

        let redraws = Arc::clone(&panel.redraws);
        let last_cause = Arc::clone(&panel.last_cause);
        panel.events.subscribe_to_scope(
            "dataset",
            EventHandler::new(move |event| {
                redraws.fetch_add(1, Ordering::SeqCst);
                *last_cause.lock() = event.original_event().map(str::to_string);
                tracing::debug!(
                    "Chart redraw for {} from {}",
                    event.get_str("dataset_id").unwrap_or("?"),
                    event.source_component().unwrap_or("?")
                );
            }),
        )?;
        Ok(panel)
    }

    /// Number of redraws triggered so far
    pub fn redraw_count(&self) -> usize {
        self.redraws.load(Ordering::SeqCst)
    }

    /// Event that caused the most recent redraw
    pub fn last_cause(&self) -> Option<String> {
        self.last_cause.lock().clone()
    }

    /// Release all subscriptions
    pub fn close(&self) {
        self.events.unsubscribe_all();
    }
}

/// Analysis sidebar: tracks dataset structure and publishes results
#[derive(Debug)]
pub struct AnalysisPanel {
    events: EventComponent,
    known_columns: Arc<Mutex<Vec<String>>>,
}

impl AnalysisPanel {
    pub fn new(ctx: &AppContext) -> anyhow::Result<Self> {
        let panel = Self {
            events: EventComponent::new(Arc::clone(ctx.event_bus()), "AnalysisPanel"),
            known_columns: Arc::new(Mutex::new(Vec::new())),
        };

        let known_columns = Arc::clone(&panel.known_columns);
        panel.events.subscribe_to_event(
            events::dataset::COLUMN_ADDED,
            EventHandler::fallible(move |event| {
                let column = event
                    .get_str("column_name")
                    .ok_or_else(|| anyhow::anyhow!("column_added without column_name"))?;
                known_columns.lock().push(column.to_string());
                Ok(())
            }),
        )?;
        Ok(panel)
    }

    /// Columns this panel has been told about
    pub fn known_columns(&self) -> Vec<String> {
        self.known_columns.lock().clone()
    }

    /// Publish the result of an analysis that added `result_column`
    pub fn complete(&self, dataset_id: &str, analysis_type: &str, result_column: &str) {
        self.events.publish_event(
            events::analysis::COMPLETED,
            payload! {
                "dataset_id" => dataset_id,
                "analysis_type" => analysis_type,
                "column_name" => result_column,
            },
        );
    }

    /// Release all subscriptions
    pub fn close(&self) {
        self.events.unsubscribe_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pandaplot_settings::Config;

    #[test]
    fn test_dataset_edits_reach_chart_and_analysis() {
        let ctx = AppContext::new(Config::new()).expect("context");
        let mut dataset = DatasetPanel::new(&ctx, "d1");
        let chart = ChartPanel::new(&ctx).expect("chart");
        let analysis = AnalysisPanel::new(&ctx).expect("analysis");

        dataset.add_column("time");
        dataset.add_column("velocity");

        assert_eq!(dataset.columns(), ["time", "velocity"]);
        assert_eq!(chart.redraw_count(), 2);
        assert_eq!(chart.last_cause().as_deref(), Some("dataset.column_added"));
        assert_eq!(analysis.known_columns(), ["time", "velocity"]);
    }

    #[test]
    fn test_analysis_result_propagates_as_column_added() {
        let ctx = AppContext::new(Config::new()).expect("context");
        let chart = ChartPanel::new(&ctx).expect("chart");
        let analysis = AnalysisPanel::new(&ctx).expect("analysis");

        analysis.complete("d1", "regression", "fit_residuals");

        assert_eq!(chart.redraw_count(), 1);
        assert_eq!(chart.last_cause().as_deref(), Some("analysis.completed"));
        assert_eq!(analysis.known_columns(), ["fit_residuals"]);
    }

    #[test]
    fn test_remove_column() {
        let ctx = AppContext::new(Config::new()).expect("context");
        let mut dataset = DatasetPanel::new(&ctx, "d2");
        let chart = ChartPanel::new(&ctx).expect("chart");

        dataset.add_column("x");
        assert!(dataset.remove_column("x"));
        assert!(!dataset.remove_column("x"));
        assert_eq!(chart.redraw_count(), 2);
        assert_eq!(chart.last_cause().as_deref(), Some("dataset.column_removed"));
    }

    #[test]
    fn test_closed_panels_stop_listening() {
        let ctx = AppContext::new(Config::new()).expect("context");
        let mut dataset = DatasetPanel::new(&ctx, "d3");
        let chart = ChartPanel::new(&ctx).expect("chart");
        let analysis = AnalysisPanel::new(&ctx).expect("analysis");
        assert_eq!(ctx.event_bus().subscribers_count(None), 2);

        chart.close();
        analysis.close();
        assert_eq!(ctx.event_bus().subscribers_count(None), 0);

        dataset.add_column("y");
        assert_eq!(chart.redraw_count(), 0);
        assert!(analysis.known_columns().is_empty());
        assert_eq!(dataset.dataset_id(), "d3");
    }
}
