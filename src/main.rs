use pandaplot::{init_logging, AnalysisPanel, AppContext, ChartPanel, DatasetPanel};
use pandaplot_settings::{default_config_path, Config};
use std::path::PathBuf;

fn load_config() -> anyhow::Result<Config> {
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        return Ok(Config::load_from_file(&path)?);
    }
    match default_config_path() {
        Ok(path) if path.exists() => Ok(Config::load_from_file(&path)?),
        _ => Ok(Config::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_logging(&config.logging)?;
    tracing::info!(
        "pandaplot {} (built {})",
        pandaplot::VERSION,
        pandaplot::BUILD_DATE
    );

    let ctx = AppContext::new(config)?;

    let mut dataset = DatasetPanel::new(&ctx, "measurements");
    let chart = ChartPanel::new(&ctx)?;
    let analysis = AnalysisPanel::new(&ctx)?;

    dataset.add_column("time");
    dataset.add_column("velocity");
    analysis.complete(dataset.dataset_id(), "derivative", "acceleration");

    tracing::info!(
        "Chart redrew {} time(s), last because of {}",
        chart.redraw_count(),
        chart.last_cause().unwrap_or_default()
    );
    tracing::info!("Analysis knows columns {:?}", analysis.known_columns());

    chart.close();
    analysis.close();
    ctx.shutdown();

    Ok(())
}
