use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use shiptrack_core::cache::SnapshotCache;
use shiptrack_core::config::CacheConfig;
use shiptrack_core::types::Dataset;

fn empty_dataset() -> Dataset {
    Dataset {
        records: Vec::new(),
        sources: Vec::new(),
        loaded_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn disabled_cache_rebuilds_every_time() {
    let mut cache = SnapshotCache::disabled();
    let files = paths(&["a.csv"]);
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let mut builds = 0;
    for _ in 0..3 {
        cache
            .get_or_build(&files, now, || {
                builds += 1;
                Ok(empty_dataset())
            })
            .unwrap();
    }
    assert_eq!(builds, 3);
}

#[test]
fn ttl_cache_returns_same_snapshot_within_ttl() {
    let mut cache = SnapshotCache::new(&CacheConfig {
        enabled: true,
        ttl_secs: Some(60),
    });
    let files = paths(&["a.csv", "b.csv"]);
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let first = cache.get_or_build(&files, t0, || Ok(empty_dataset())).unwrap();
    let second = cache
        .get_or_build(&files, t0 + Duration::seconds(30), || {
            panic!("should not rebuild within TTL")
        })
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn ttl_cache_rebuilds_after_expiry() {
    let mut cache = SnapshotCache::new(&CacheConfig {
        enabled: true,
        ttl_secs: Some(60),
    });
    let files = paths(&["a.csv"]);
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let first = cache.get_or_build(&files, t0, || Ok(empty_dataset())).unwrap();
    let second = cache
        .get_or_build(&files, t0 + Duration::seconds(61), || Ok(empty_dataset()))
        .unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn cache_without_ttl_never_expires() {
    let mut cache = SnapshotCache::new(&CacheConfig {
        enabled: true,
        ttl_secs: None,
    });
    let files = paths(&["a.csv"]);
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let first = cache.get_or_build(&files, t0, || Ok(empty_dataset())).unwrap();
    let second = cache
        .get_or_build(&files, t0 + Duration::days(365), || {
            panic!("never-expiring cache must not rebuild")
        })
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn changing_the_input_set_misses_the_cache() {
    let mut cache = SnapshotCache::new(&CacheConfig {
        enabled: true,
        ttl_secs: Some(60),
    });
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let first = cache
        .get_or_build(&paths(&["a.csv"]), t0, || Ok(empty_dataset()))
        .unwrap();
    let second = cache
        .get_or_build(&paths(&["a.csv", "b.csv"]), t0, || Ok(empty_dataset()))
        .unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn key_comparison_ignores_path_order() {
    let mut cache = SnapshotCache::new(&CacheConfig {
        enabled: true,
        ttl_secs: Some(60),
    });
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let first = cache
        .get_or_build(&paths(&["a.csv", "b.csv"]), t0, || Ok(empty_dataset()))
        .unwrap();
    let second = cache
        .get_or_build(&paths(&["b.csv", "a.csv"]), t0, || {
            panic!("same path set must hit the cache")
        })
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn invalidate_drops_the_entry() {
    let mut cache = SnapshotCache::new(&CacheConfig {
        enabled: true,
        ttl_secs: None,
    });
    let files = paths(&["a.csv"]);
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let first = cache.get_or_build(&files, t0, || Ok(empty_dataset())).unwrap();
    cache.invalidate();
    let second = cache.get_or_build(&files, t0, || Ok(empty_dataset())).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}
