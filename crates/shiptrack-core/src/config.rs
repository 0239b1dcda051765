use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use shiptrack_parser::{AliasTable, SchemaOverrides};

use crate::error::{PipelineError, Result};

pub const MIN_REFRESH_SECS: u64 = 2;
pub const MAX_REFRESH_SECS: u64 = 300;

const DEFAULT_REFRESH_SECS: u64 = 8;
const DEFAULT_MAX_POINTS: usize = 1500;
const DEFAULT_PATTERN: &str = "*.csv";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data: DataConfig,
    pub dashboard: DashboardConfig,
    pub cache: CacheConfig,
    pub schema: SchemaOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Explicit input files, read in the order given.
    pub files: Vec<PathBuf>,
    /// Optional directory scanned with `pattern`, appended after `files`.
    pub dir: Option<PathBuf>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub refresh_secs: u64,
    pub max_points_per_vessel: usize,
    /// Vessel selection in order; `None` selects every vessel.
    pub vessels: Option<Vec<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_secs: DEFAULT_REFRESH_SECS,
            max_points_per_vessel: DEFAULT_MAX_POINTS,
            vessels: None,
            start_date: None,
            end_date: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Seconds until a cached snapshot expires; absent means never.
    pub ttl_secs: Option<u64>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validated()
    }

    /// Resolve the config path from an explicit flag or `SHIPTRACK_CONFIG`;
    /// with neither set, built-in defaults apply.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match std::env::var_os("SHIPTRACK_CONFIG") {
                Some(env_path) => Self::load(Path::new(&env_path)),
                None => AppConfig::default().validated(),
            },
        }
    }

    fn validated(mut self) -> Result<Self> {
        self.dashboard.refresh_secs = self
            .dashboard
            .refresh_secs
            .clamp(MIN_REFRESH_SECS, MAX_REFRESH_SECS);

        if self.dashboard.max_points_per_vessel == 0 {
            return Err(PipelineError::Validation(
                "dashboard.max_points_per_vessel must be at least 1".to_string(),
            ));
        }

        if let (Some(start), Some(end)) = (self.dashboard.start_date, self.dashboard.end_date) {
            if start > end {
                return Err(PipelineError::Validation(format!(
                    "dashboard.start_date {start} is after end_date {end}"
                )));
            }
        }

        Ok(self)
    }

    pub fn alias_table(&self) -> AliasTable {
        AliasTable::with_overrides(&self.schema)
    }
}

impl DataConfig {
    /// Expand the configured files and directory pattern into a de-duplicated
    /// input list. Paths that do not exist are kept; ingestion reports them
    /// as missing instead of failing here.
    pub fn input_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = self.files.clone();

        if let Some(dir) = &self.dir {
            let pattern = self.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
            let full_pattern = dir.join(pattern);
            let full_pattern = full_pattern.to_string_lossy().into_owned();
            let mut matched: Vec<PathBuf> = glob::glob(&full_pattern)?
                .filter_map(|entry| entry.ok())
                .collect();
            matched.sort();
            files.extend(matched);
        }

        let mut seen = BTreeSet::new();
        files.retain(|path| seen.insert(path.clone()));
        Ok(files)
    }
}
