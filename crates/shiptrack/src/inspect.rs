use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use shiptrack_core::config::AppConfig;
use shiptrack_core::filter::TrackFilter;
use shiptrack_core::ingestion::load_from_config;
use shiptrack_core::preview::preview_frame;
use shiptrack_core::types::Dataset;

/// Terminal view of the current snapshot: source reports, per-vessel
/// summaries, and the most recent records.
pub fn run(config: &AppConfig, limit: usize) -> Result<()> {
    let dataset = load_from_config(config).context("failed to load position sources")?;

    println!("Sources:");
    println!("{}", source_table(&dataset));

    println!("\nVessels:");
    println!("{}", vessel_table(&dataset));

    let view = TrackFilter::from_config(&config.dashboard).apply(&dataset);
    if view.is_empty() {
        println!("\nNo data in selected date range / ships.");
        return Ok(());
    }

    println!("\nMost recent {limit} records:");
    println!("{}", record_table(&view.records, limit)?);
    Ok(())
}

fn source_table(dataset: &Dataset) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(["path", "status", "records", "dropped", "note"]);
    for source in &dataset.sources {
        table.add_row([
            source.path.clone(),
            format!("{:?}", source.status).to_lowercase(),
            source.records.to_string(),
            source.rows_dropped.to_string(),
            source.note.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn vessel_table(dataset: &Dataset) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(["vessel", "records", "first seen", "last seen", "category"]);
    for summary in dataset.vessel_summaries() {
        table.add_row([
            summary.vessel_id,
            summary.records.to_string(),
            summary.first_timestamp.to_rfc3339(),
            summary.last_timestamp.to_rfc3339(),
            summary.category.unwrap_or_default(),
        ]);
    }
    table
}

fn record_table(records: &[shiptrack_core::types::Position], limit: usize) -> Result<Table> {
    let frame = preview_frame(records, limit).context("failed to build preview frame")?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(
        frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string()),
    );

    for row_idx in 0..frame.height() {
        let mut cells = Vec::with_capacity(frame.width());
        for column in frame.get_columns() {
            let value = column
                .as_materialized_series()
                .get(row_idx)
                .map(|v| v.to_string())
                .unwrap_or_default();
            cells.push(value);
        }
        table.add_row(cells);
    }
    Ok(table)
}
