use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::types::Dataset;

/// Optional cache for the most recent dataset snapshot.
///
/// Keyed by the sorted input path set; invalidated by TTL, or never when no
/// TTL is configured. Hits hand out `Arc` clones of the immutable snapshot,
/// so concurrent render passes share nothing mutable.
pub struct SnapshotCache {
    mode: CacheMode,
    entry: Option<CacheEntry>,
}

#[derive(Debug, Clone, Copy)]
enum CacheMode {
    Disabled,
    Ttl(Duration),
    Forever,
}

struct CacheEntry {
    key: Vec<PathBuf>,
    built_at: DateTime<Utc>,
    dataset: Arc<Dataset>,
}

impl SnapshotCache {
    pub fn new(config: &CacheConfig) -> Self {
        let mode = if !config.enabled {
            CacheMode::Disabled
        } else {
            match config.ttl_secs {
                Some(secs) => CacheMode::Ttl(Duration::seconds(secs as i64)),
                None => CacheMode::Forever,
            }
        };
        Self { mode, entry: None }
    }

    pub fn disabled() -> Self {
        Self {
            mode: CacheMode::Disabled,
            entry: None,
        }
    }

    /// Return the cached snapshot when the key matches and the entry is
    /// still fresh at `now`; otherwise run `build` and cache its result.
    pub fn get_or_build<F>(
        &mut self,
        files: &[PathBuf],
        now: DateTime<Utc>,
        build: F,
    ) -> Result<Arc<Dataset>>
    where
        F: FnOnce() -> Result<Dataset>,
    {
        if matches!(self.mode, CacheMode::Disabled) {
            return Ok(Arc::new(build()?));
        }

        let key = cache_key(files);
        if let Some(entry) = &self.entry {
            if entry.key == key && self.is_fresh(entry.built_at, now) {
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        let dataset = Arc::new(build()?);
        self.entry = Some(CacheEntry {
            key,
            built_at: now,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    fn is_fresh(&self, built_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.mode {
            CacheMode::Disabled => false,
            CacheMode::Forever => true,
            CacheMode::Ttl(ttl) => now - built_at <= ttl,
        }
    }
}

fn cache_key(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut key: Vec<PathBuf> = files.iter().map(|p| p.to_path_buf()).collect();
    key.sort();
    key
}
