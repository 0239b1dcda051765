use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use shiptrack::{build_router, AppState};
use shiptrack_core::config::AppConfig;
use tower::ServiceExt;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.data.files = vec![fixture_path("singapore.csv")];
    config
}

async fn get(config: AppConfig, uri: &str) -> (StatusCode, Value) {
    let router = build_router(Arc::new(AppState::new(config)));
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn index_serves_dashboard_html() {
    let router = build_router(Arc::new(AppState::new(test_config())));
    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("const REFRESH_SECS = 8;"));
    assert!(html.contains("/api/track.geojson"));
}

#[tokio::test]
async fn track_endpoint_returns_feature_collection() {
    let (status, body) = get(test_config(), "/api/track.geojson").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["records"], 3);
    assert_eq!(body["selected"], 2);
    assert_eq!(body["collection"]["type"], "FeatureCollection");

    // S1 track line plus two markers per vessel; S2 has one fix, markers only.
    let features = body["collection"]["features"].as_array().unwrap();
    assert_eq!(features.len(), 5);
}

#[tokio::test]
async fn track_endpoint_applies_vessel_filter_and_reports_center() {
    let (status, body) = get(test_config(), "/api/track.geojson?vessels=S1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 2);
    assert_eq!(body["selected"], 1);

    let center = body["center"].as_array().unwrap();
    assert!((center[0].as_f64().unwrap() - 1.005).abs() < 1e-9);
    assert!((center[1].as_f64().unwrap() - 103.005).abs() < 1e-9);
}

#[tokio::test]
async fn unknown_vessel_yields_explicit_no_data_state() {
    let (status, body) = get(test_config(), "/api/track.geojson?vessels=GHOST").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "no data");
    assert_eq!(body["records"], 0);
    assert!(body["collection"]["features"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn date_filter_excludes_out_of_range_records() {
    let (status, body) = get(
        test_config(),
        "/api/track.geojson?start=2024-01-02&end=2024-01-03",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "no data");
}

#[tokio::test]
async fn max_points_query_overrides_config() {
    let (status, body) = get(test_config(), "/api/track.geojson?vessels=S1&max_points=1").await;

    assert_eq!(status, StatusCode::OK);
    // Two S1 fixes with a cap of 1: stride 2 keeps the first fix only.
    assert_eq!(body["rendered_points"], 1);
}

#[tokio::test]
async fn vessels_endpoint_lists_summaries() {
    let (status, body) = get(test_config(), "/api/vessels").await;

    assert_eq!(status, StatusCode::OK);
    let vessels = body["vessels"].as_array().unwrap();
    assert_eq!(vessels.len(), 2);
    assert_eq!(vessels[0]["vessel_id"], "S1");
    assert_eq!(vessels[0]["records"], 2);
}

#[tokio::test]
async fn preview_endpoint_limits_rows() {
    let (status, body) = get(test_config(), "/api/preview?limit=1").await;

    assert_eq!(status, StatusCode::OK);
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn sources_endpoint_reports_loaded_file() {
    let (status, body) = get(test_config(), "/api/sources").await;

    assert_eq!(status, StatusCode::OK);
    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["status"], "loaded");
    assert_eq!(sources[0]["records"], 3);
}

#[tokio::test]
async fn missing_sources_map_to_service_unavailable() {
    let mut config = AppConfig::default();
    config.data.files = vec![fixture_path("does_not_exist.csv")];

    let (status, body) = get(config, "/api/track.geojson").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("no usable position source"));
}
