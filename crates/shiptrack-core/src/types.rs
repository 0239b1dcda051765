use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use shiptrack_parser::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Loaded,
    Missing,
    Unusable,
    Failed,
}

/// Per-source ingestion outcome, one per configured input file.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub path: String,
    pub status: SourceStatus,
    pub records: usize,
    pub rows_dropped: usize,
    pub hash: Option<String>,
    pub note: Option<String>,
}

/// Immutable snapshot of every record ingested in one load cycle.
///
/// Built once per cycle and never mutated; the next refresh builds a fresh
/// one from scratch.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<Position>,
    pub sources: Vec<SourceReport>,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct vessel identifiers, sorted.
    pub fn vessel_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .records
            .iter()
            .map(|record| record.vessel_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn vessel_summaries(&self) -> Vec<VesselSummary> {
        let mut by_vessel: HashMap<&str, VesselAccumulator> = HashMap::new();
        for record in &self.records {
            let entry = by_vessel
                .entry(record.vessel_id.as_str())
                .or_insert_with(|| VesselAccumulator::new(record));
            entry.push(record);
        }

        let mut summaries: Vec<VesselSummary> = by_vessel
            .into_iter()
            .map(|(vessel_id, acc)| VesselSummary {
                vessel_id: vessel_id.to_string(),
                records: acc.records,
                first_timestamp: acc.first_timestamp,
                last_timestamp: acc.last_timestamp,
                category: acc.category,
            })
            .collect();
        summaries.sort_by(|a, b| a.vessel_id.cmp(&b.vessel_id));
        summaries
    }

    pub fn time_extent(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.records.iter().map(|r| r.timestamp).min()?;
        let last = self.records.iter().map(|r| r.timestamp).max()?;
        Some((first, last))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VesselSummary {
    pub vessel_id: String,
    pub records: usize,
    pub first_timestamp: DateTime<Utc>,
    pub last_timestamp: DateTime<Utc>,
    pub category: Option<String>,
}

struct VesselAccumulator {
    records: usize,
    first_timestamp: DateTime<Utc>,
    last_timestamp: DateTime<Utc>,
    category: Option<String>,
}

impl VesselAccumulator {
    fn new(record: &Position) -> Self {
        Self {
            records: 0,
            first_timestamp: record.timestamp,
            last_timestamp: record.timestamp,
            category: None,
        }
    }

    fn push(&mut self, record: &Position) {
        self.records += 1;
        if record.timestamp < self.first_timestamp {
            self.first_timestamp = record.timestamp;
        }
        if record.timestamp > self.last_timestamp {
            self.last_timestamp = record.timestamp;
        }
        if self.category.is_none() {
            self.category = record.category.clone();
        }
    }
}

/// One vessel's time-ordered track, after decimation.
///
/// `selection_index` is the vessel's position in the selection order and
/// drives palette assignment; vessels that matched no records still consume
/// an index, so colors shift with the selection, not with the data.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub vessel_id: String,
    pub selection_index: usize,
    pub points: Vec<Position>,
    pub total_points: usize,
}
