use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use shiptrack_core::config::AppConfig;
use shiptrack_core::filter::TrackFilter;
use shiptrack_core::ingestion::load_from_config;
use shiptrack_core::render::{render_map, standalone_html};
use shiptrack_core::trajectory::build_trajectories;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RenderFormat {
    Html,
    Geojson,
}

/// One-shot render of the current snapshot. The no-data state logs a
/// warning and writes nothing.
pub fn render_to_file(config: &AppConfig, out: &Path, format: RenderFormat) -> Result<()> {
    let dataset = load_from_config(config).context("failed to load position sources")?;

    let view = TrackFilter::from_config(&config.dashboard).apply(&dataset);
    if view.is_empty() {
        warn!("no data in selected date range / ships; nothing written");
        return Ok(());
    }

    let trajectories = build_trajectories(&view, config.dashboard.max_points_per_vessel);
    let rendered = render_map(&trajectories);

    let contents = match format {
        RenderFormat::Html => standalone_html(&rendered).context("failed to build HTML page")?,
        RenderFormat::Geojson => serde_json::to_string_pretty(&rendered.collection)
            .context("failed to serialize GeoJSON")?,
    };

    std::fs::write(out, contents)
        .with_context(|| format!("failed to write {}", out.display()))?;
    info!(
        path = %out.display(),
        records = view.records.len(),
        vessels = rendered.legend.len(),
        "wrote rendered map"
    );
    Ok(())
}
