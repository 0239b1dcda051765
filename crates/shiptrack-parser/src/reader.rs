use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::StringRecord;

use crate::errors::ParseError;
use crate::model::{Position, SourceData};
use crate::resolver::{resolve_columns, ColumnMap, Resolution};
use crate::schema::AliasTable;

/// Parse one delimited source into normalized position records.
///
/// Row-level failures (missing required fields, unparsable or out-of-range
/// values) drop the row and bump `rows_dropped`; they are never errors. The
/// only hard failure is a structurally broken CSV stream.
pub fn parse_positions(
    content: &str,
    source_name: &str,
    table: &AliasTable,
) -> Result<SourceData, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) if !headers.is_empty() => headers.clone(),
        Ok(_) => return Ok(SourceData::unusable(source_name, "file has no header row")),
        Err(err) => return Err(ParseError::csv(source_name, err)),
    };

    let columns = match resolve_columns(&headers, table) {
        Resolution::Usable(columns) => columns,
        Resolution::Unusable { reason } => return Ok(SourceData::unusable(source_name, reason)),
    };

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;

    for record in reader.records() {
        let record = record.map_err(|err| ParseError::csv(source_name, err))?;
        rows_read += 1;
        match coerce_row(&record, &columns, source_name) {
            Some(position) => records.push(position),
            None => rows_dropped += 1,
        }
    }

    Ok(SourceData {
        source: source_name.to_string(),
        records,
        rows_read,
        rows_dropped,
        note: None,
    })
}

fn coerce_row(record: &StringRecord, columns: &ColumnMap, source_name: &str) -> Option<Position> {
    let vessel_id = match columns.vessel_id {
        Some(idx) => non_empty(record.get(idx))?,
        None => source_name.to_string(),
    };

    let lat = parse_opt_f64(record.get(columns.lat))?;
    let lon = parse_opt_f64(record.get(columns.lon))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }

    let timestamp = parse_timestamp(record.get(columns.timestamp?)?)?;

    let speed_knots = columns
        .speed
        .and_then(|idx| parse_opt_f64(record.get(idx)))
        .filter(|speed| *speed >= 0.0);
    let heading_deg = columns
        .heading
        .and_then(|idx| parse_opt_f64(record.get(idx)))
        .filter(|heading| (0.0..360.0).contains(heading));
    let category = columns.category.and_then(|idx| non_empty(record.get(idx)));

    Some(Position {
        vessel_id,
        lat,
        lon,
        timestamp,
        speed_knots,
        heading_deg,
        category,
        source: source_name.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse failure yields `None`, never zero.
fn parse_opt_f64(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

static TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Timestamps with an explicit offset are honored; naive values are taken
/// as UTC, which is what AIS exports carry.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}
