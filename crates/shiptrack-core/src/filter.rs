use chrono::{DateTime, NaiveDate, Utc};

use crate::config::DashboardConfig;
use crate::types::{Dataset, Position};

/// Vessel-subset and date-range selection over a snapshot.
///
/// The vessel list order is the *selection order*: it decides palette
/// indices downstream. The date range is inclusive; the end date extends to
/// the last second of that day.
#[derive(Debug, Clone, Default)]
pub struct TrackFilter {
    pub vessels: Option<Vec<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Filtered records plus the selection order they were chosen by.
#[derive(Debug, Clone)]
pub struct FilteredView {
    pub records: Vec<Position>,
    pub selection: Vec<String>,
}

impl FilteredView {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TrackFilter {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            vessels: config.vessels.clone(),
            start_date: config.start_date,
            end_date: config.end_date,
        }
    }

    pub fn apply(&self, dataset: &Dataset) -> FilteredView {
        let selection: Vec<String> = match &self.vessels {
            Some(requested) => dedup_preserving_order(requested),
            None => dataset.vessel_ids(),
        };

        let start = self.start_date.and_then(start_of_day);
        let end = self.end_date.and_then(end_of_day);

        let records: Vec<Position> = dataset
            .records
            .iter()
            .filter(|record| selection.iter().any(|vessel| *vessel == record.vessel_id))
            .filter(|record| start.is_none_or(|start| record.timestamp >= start))
            .filter(|record| end.is_none_or(|end| record.timestamp <= end))
            .cloned()
            .collect();

        FilteredView { records, selection }
    }
}

fn dedup_preserving_order(vessels: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for vessel in vessels {
        if !seen.contains(vessel) {
            seen.push(vessel.clone());
        }
    }
    seen
}

fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(date.and_hms_opt(23, 59, 59)?.and_utc())
}
