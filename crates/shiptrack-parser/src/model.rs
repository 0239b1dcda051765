use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized ship-position report.
///
/// Required fields are guaranteed present and in range for every record the
/// reader emits; rows that fail coercion never become a `Position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub vessel_id: String,
    pub lat: f64,
    pub lon: f64,
    pub timestamp: DateTime<Utc>,
    pub speed_knots: Option<f64>,
    pub heading_deg: Option<f64>,
    pub category: Option<String>,
    pub source: String,
}

/// Outcome of parsing a single source file.
///
/// An unusable source (no resolvable lat/lon columns) is not an error: it
/// carries zero records and a `note` explaining why.
#[derive(Debug, Clone)]
pub struct SourceData {
    pub source: String,
    pub records: Vec<Position>,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub note: Option<String>,
}

impl SourceData {
    pub fn unusable(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            records: Vec::new(),
            rows_read: 0,
            rows_dropped: 0,
            note: Some(reason.into()),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.note.is_none()
    }
}
