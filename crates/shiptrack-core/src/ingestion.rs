use std::path::{Path, PathBuf};

use chrono::Utc;
use shiptrack_parser::{parse_positions, AliasTable};
use tracing::warn;

use crate::config::AppConfig;
use crate::error::{PipelineError, Result};
use crate::types::{Dataset, Position, SourceReport, SourceStatus};

/// Build a fresh dataset snapshot from the given source files.
///
/// Nothing below source level is fatal: missing files are skipped with a
/// warning, sources without position columns contribute zero records, and
/// malformed rows are dropped inside the parser. The one fatal condition is
/// that no source loads at all.
pub fn load_dataset(files: &[PathBuf], table: &AliasTable) -> Result<Dataset> {
    let mut records: Vec<Position> = Vec::new();
    let mut sources: Vec<SourceReport> = Vec::new();

    for path in files {
        let report = ingest_source(path, table, &mut records);
        sources.push(report);
    }

    if !sources
        .iter()
        .any(|source| source.status == SourceStatus::Loaded)
    {
        let detail = if sources.is_empty() {
            "no input files configured".to_string()
        } else {
            let mut reasons: Vec<String> = sources
                .iter()
                .map(|source| {
                    format!(
                        "{}: {}",
                        source.path,
                        source.note.as_deref().unwrap_or("not loaded")
                    )
                })
                .collect();
            reasons.sort();
            reasons.join("; ")
        };
        return Err(PipelineError::NoUsableSources(detail));
    }

    Ok(Dataset {
        records,
        sources,
        loaded_at: Utc::now(),
    })
}

/// Convenience wrapper: expand the configured inputs and load them with the
/// configured alias table.
pub fn load_from_config(config: &AppConfig) -> Result<Dataset> {
    let files = config.data.input_files()?;
    load_dataset(&files, &config.alias_table())
}

fn ingest_source(path: &Path, table: &AliasTable, records: &mut Vec<Position>) -> SourceReport {
    let display_path = path.display().to_string();
    let source_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| display_path.clone());

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %display_path, "source file does not exist, skipping");
            return SourceReport {
                path: display_path,
                status: SourceStatus::Missing,
                records: 0,
                rows_dropped: 0,
                hash: None,
                note: Some("file does not exist".to_string()),
            };
        }
        Err(err) => {
            warn!(path = %display_path, error = %err, "failed to read source file");
            return SourceReport {
                path: display_path,
                status: SourceStatus::Failed,
                records: 0,
                rows_dropped: 0,
                hash: None,
                note: Some(err.to_string()),
            };
        }
    };

    let hash = blake3::hash(&bytes).to_hex().to_string();

    let content = match std::str::from_utf8(&bytes) {
        Ok(content) => content,
        Err(_) => {
            return SourceReport {
                path: display_path,
                status: SourceStatus::Failed,
                records: 0,
                rows_dropped: 0,
                hash: Some(hash),
                note: Some("file contents were not valid UTF-8".to_string()),
            };
        }
    };

    match parse_positions(content, &source_name, table) {
        Ok(parsed) if parsed.is_usable() => {
            let report = SourceReport {
                path: display_path,
                status: SourceStatus::Loaded,
                records: parsed.records.len(),
                rows_dropped: parsed.rows_dropped,
                hash: Some(hash),
                note: None,
            };
            records.extend(parsed.records);
            report
        }
        Ok(parsed) => SourceReport {
            path: display_path,
            status: SourceStatus::Unusable,
            records: 0,
            rows_dropped: 0,
            hash: Some(hash),
            note: parsed.note,
        },
        Err(err) => SourceReport {
            path: display_path,
            status: SourceStatus::Failed,
            records: 0,
            rows_dropped: 0,
            hash: Some(hash),
            note: Some(err.to_string()),
        },
    }
}
