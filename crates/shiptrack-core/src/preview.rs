use polars::prelude::*;

use crate::error::Result;
use crate::types::Position;

/// Tabular preview of the most recent `limit` records, oldest first.
///
/// Columns are built from the typed records, with the timestamp cast to a
/// microsecond datetime column.
pub fn preview_frame(records: &[Position], limit: usize) -> Result<DataFrame> {
    let mut ordered: Vec<&Position> = records.iter().collect();
    ordered.sort_by_key(|record| record.timestamp);
    let skip = ordered.len().saturating_sub(limit);
    let recent = &ordered[skip..];

    let vessel_ids: Vec<&str> = recent.iter().map(|r| r.vessel_id.as_str()).collect();
    let timestamps: Vec<i64> = recent.iter().map(|r| r.timestamp.timestamp_micros()).collect();
    let lats: Vec<f64> = recent.iter().map(|r| r.lat).collect();
    let lons: Vec<f64> = recent.iter().map(|r| r.lon).collect();
    let speeds: Vec<Option<f64>> = recent.iter().map(|r| r.speed_knots).collect();
    let headings: Vec<Option<f64>> = recent.iter().map(|r| r.heading_deg).collect();
    let categories: Vec<Option<&str>> = recent.iter().map(|r| r.category.as_deref()).collect();
    let sources: Vec<&str> = recent.iter().map(|r| r.source.as_str()).collect();

    let ts_series = Series::new("timestamp".into(), timestamps)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;

    let mut cols: Vec<Column> = Vec::new();
    cols.push(Series::new("vessel_id".into(), vessel_ids).into());
    cols.push(ts_series.into());
    cols.push(Series::new("lat".into(), lats).into());
    cols.push(Series::new("lon".into(), lons).into());
    cols.push(Series::new("speed_knots".into(), speeds).into());
    cols.push(Series::new("heading_deg".into(), headings).into());
    cols.push(Series::new("category".into(), categories).into());
    cols.push(Series::new("source".into(), sources).into());

    Ok(DataFrame::new(cols)?)
}

/// JSON rows for the preview endpoint, one object per record.
pub fn preview_rows(records: &[Position], limit: usize) -> Vec<serde_json::Value> {
    let mut ordered: Vec<&Position> = records.iter().collect();
    ordered.sort_by_key(|record| record.timestamp);
    let skip = ordered.len().saturating_sub(limit);

    ordered[skip..]
        .iter()
        .map(|record| {
            serde_json::json!({
                "vessel_id": record.vessel_id,
                "timestamp": record.timestamp.to_rfc3339(),
                "lat": record.lat,
                "lon": record.lon,
                "speed_knots": record.speed_knots,
                "heading_deg": record.heading_deg,
                "category": record.category,
                "source": record.source,
            })
        })
        .collect()
}
