use std::fs;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use csv::StringRecord;

use crate::parse_positions;
use crate::reader::parse_timestamp;
use crate::resolver::{resolve_columns, Resolution};
use crate::schema::{AliasTable, SchemaOverrides};

fn fixture(path: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

fn headers(names: &[&str]) -> StringRecord {
    StringRecord::from(names.to_vec())
}

#[test]
fn parses_marine_cadastre_style_headers() {
    let content = fixture("ais_marine_cadastre.csv");
    let parsed =
        parse_positions(&content, "ais_marine_cadastre.csv", &AliasTable::default()).unwrap();

    assert!(parsed.is_usable());
    assert_eq!(parsed.rows_read, 5);
    assert_eq!(parsed.rows_dropped, 0);
    assert_eq!(parsed.records.len(), 5);

    let first = &parsed.records[0];
    assert_eq!(first.vessel_id, "367001234");
    assert_eq!(first.lat, 1.2653);
    assert_eq!(first.lon, 103.8220);
    assert_eq!(
        first.timestamp,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(first.speed_knots, Some(12.3));
    assert_eq!(first.heading_deg, Some(87.0));
    assert_eq!(first.category.as_deref(), Some("Cargo"));
    assert_eq!(first.source, "ais_marine_cadastre.csv");
}

#[test]
fn parses_simple_ship_id_file() {
    let content = fixture("ais_simple.csv");
    let parsed = parse_positions(&content, "ais_simple.csv", &AliasTable::default()).unwrap();

    assert_eq!(parsed.records.len(), 3);
    assert_eq!(parsed.records[0].vessel_id, "S1");
    assert!(parsed.records[0].speed_knots.is_none());
    assert!(parsed.records[0].category.is_none());
}

#[test]
fn missing_vessel_column_falls_back_to_source_name() {
    let content = fixture("ais_no_id.csv");
    let parsed = parse_positions(&content, "oslo_ferry.csv", &AliasTable::default()).unwrap();

    assert_eq!(parsed.records.len(), 2);
    assert!(parsed
        .records
        .iter()
        .all(|record| record.vessel_id == "oslo_ferry.csv"));
}

#[test]
fn missing_longitude_makes_source_unusable_not_an_error() {
    let content = fixture("ais_no_lon.csv");
    let parsed = parse_positions(&content, "ais_no_lon.csv", &AliasTable::default()).unwrap();

    assert!(!parsed.is_usable());
    assert!(parsed.records.is_empty());
    assert_eq!(parsed.rows_read, 0);
    assert_eq!(
        parsed.note.as_deref(),
        Some("no longitude-like column found")
    );
}

#[test]
fn invalid_rows_are_dropped_and_counted() {
    let content = fixture("ais_messy.csv");
    let parsed = parse_positions(&content, "ais_messy.csv", &AliasTable::default()).unwrap();

    assert_eq!(parsed.rows_read, 7);
    assert_eq!(parsed.rows_dropped, 5);
    assert_eq!(parsed.records.len(), 2);

    let good = &parsed.records[0];
    assert_eq!(good.vessel_id, "GOOD");
    assert_eq!(good.speed_knots, Some(9.5));
    assert_eq!(good.heading_deg, Some(181.0));

    // nan speed and out-of-range heading survive as None, the row survives.
    let partial = &parsed.records[1];
    assert_eq!(partial.vessel_id, "NAN_SPEED");
    assert!(partial.speed_knots.is_none());
    assert!(partial.heading_deg.is_none());
}

#[test]
fn every_retained_record_is_in_range() {
    for name in ["ais_marine_cadastre.csv", "ais_simple.csv", "ais_messy.csv"] {
        let parsed = parse_positions(&fixture(name), name, &AliasTable::default()).unwrap();
        for record in &parsed.records {
            assert!(!record.vessel_id.is_empty());
            assert!((-90.0..=90.0).contains(&record.lat));
            assert!((-180.0..=180.0).contains(&record.lon));
        }
    }
}

#[test]
fn resolver_is_idempotent() {
    let table = AliasTable::default();
    let record = headers(&["MMSI", "BaseDateTime", "LAT", "LON", "SOG"]);

    let first = resolve_columns(&record, &table);
    let second = resolve_columns(&record, &table);
    assert_eq!(first, second);
}

#[test]
fn resolver_picks_first_matching_column_in_file_order() {
    let table = AliasTable::default();
    // Both "mmsi" and "callsign" alias vessel_id; the earlier column wins.
    let record = headers(&["callsign", "mmsi", "lat", "lon", "time"]);

    match resolve_columns(&record, &table) {
        Resolution::Usable(columns) => {
            assert_eq!(columns.vessel_id, Some(0));
            assert_eq!(columns.lat, 2);
            assert_eq!(columns.lon, 3);
            assert_eq!(columns.timestamp, Some(4));
        }
        Resolution::Unusable { reason } => panic!("expected usable resolution, got: {reason}"),
    }
}

#[test]
fn schema_overrides_replace_default_aliases() {
    let overrides = SchemaOverrides {
        lat: Some(vec!["breitengrad".to_string()]),
        lon: Some(vec!["laengengrad".to_string()]),
        ..SchemaOverrides::default()
    };
    let table = AliasTable::with_overrides(&overrides);

    let german = headers(&["id", "Breitengrad", "Laengengrad", "time"]);
    assert!(matches!(
        resolve_columns(&german, &table),
        Resolution::Usable(_)
    ));

    // The default "lat"/"lon" names no longer resolve once overridden.
    let english = headers(&["id", "lat", "lon", "time"]);
    assert!(matches!(
        resolve_columns(&english, &table),
        Resolution::Unusable { .. }
    ));
}

#[test]
fn timestamp_formats_accepted() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap();
    for value in [
        "2024-01-01T00:05:00Z",
        "2024-01-01T00:05:00",
        "2024-01-01T00:05",
        "2024-01-01 00:05:00",
        "2024-01-01 00:05",
        "01/01/2024 00:05",
    ] {
        assert_eq!(parse_timestamp(value), Some(expected), "format: {value}");
    }

    assert_eq!(
        parse_timestamp("2024-01-01"),
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    );
    assert!(parse_timestamp("not-a-time").is_none());
    assert!(parse_timestamp("").is_none());
}

#[test]
fn missing_timestamp_column_keeps_source_usable_with_zero_records() {
    let content = "ship_id,lat,lon\nS1,1.0,103.0\n";
    let parsed = parse_positions(content, "no_time.csv", &AliasTable::default()).unwrap();

    assert!(parsed.is_usable());
    assert!(parsed.records.is_empty());
    assert_eq!(parsed.rows_read, 1);
    assert_eq!(parsed.rows_dropped, 1);
}
