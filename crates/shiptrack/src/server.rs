use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use shiptrack_core::cache::SnapshotCache;
use shiptrack_core::config::AppConfig;
use shiptrack_core::filter::TrackFilter;
use shiptrack_core::ingestion::load_dataset;
use shiptrack_core::preview::preview_rows;
use shiptrack_core::render::{dashboard_html, render_map};
use shiptrack_core::trajectory::build_trajectories;
use shiptrack_core::types::Dataset;
use shiptrack_core::{AliasTable, PipelineError};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

pub struct AppState {
    config: AppConfig,
    alias_table: AliasTable,
    cache: Mutex<SnapshotCache>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let alias_table = config.alias_table();
        let cache = Mutex::new(SnapshotCache::new(&config.cache));
        Self {
            config,
            alias_table,
            cache,
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/track.geojson", get(track_geojson))
        .route("/api/vessels", get(vessels))
        .route("/api/preview", get(preview))
        .route("/api/sources", get(sources))
        .with_state(state)
}

pub async fn serve(addr: &str, config: AppConfig) -> Result<()> {
    let state = Arc::new(AppState::new(config));
    let router = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}

/// Every data request rebuilds the snapshot through the cache; requests
/// serialize on the cache lock so an in-flight load is never interrupted.
async fn snapshot(state: &AppState) -> Result<Arc<Dataset>, ApiError> {
    let files = state.config.data.input_files().map_err(internal_error)?;

    let mut cache = state.cache.lock().await;
    cache
        .get_or_build(&files, Utc::now(), || {
            load_dataset(&files, &state.alias_table)
        })
        .map_err(|err| match err {
            PipelineError::NoUsableSources(detail) => {
                tracing::error!("no usable sources: {detail}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "message": format!("no usable position source: {detail}") })),
                )
            }
            other => internal_error(other),
        })
}

fn internal_error(err: impl std::fmt::Display) -> ApiError {
    tracing::error!("request failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": err.to_string() })),
    )
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(dashboard_html(state.config.dashboard.refresh_secs))
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackQuery {
    /// Comma-separated vessel identifiers, in selection order.
    vessels: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    max_points: Option<usize>,
}

impl TrackQuery {
    fn filter(&self, config: &AppConfig) -> TrackFilter {
        let vessels = self
            .vessels
            .as_ref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .or_else(|| config.dashboard.vessels.clone());

        TrackFilter {
            vessels,
            start_date: self.start.or(config.dashboard.start_date),
            end_date: self.end.or(config.dashboard.end_date),
        }
    }

    fn max_points(&self, config: &AppConfig) -> usize {
        self.max_points
            .filter(|max| *max > 0)
            .unwrap_or(config.dashboard.max_points_per_vessel)
    }
}

async fn track_geojson(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrackQuery>,
) -> Result<Json<Value>, ApiError> {
    let dataset = snapshot(&state).await?;

    let view = query.filter(&state.config).apply(&dataset);
    if view.is_empty() {
        return Ok(Json(json!({
            "status": "no data",
            "message": "No data in selected date range / ships.",
            "records": 0,
            "selected": view.selection.len(),
            "vessels": [],
            "center": Value::Null,
            "collection": { "type": "FeatureCollection", "features": [] },
        })));
    }

    let trajectories = build_trajectories(&view, query.max_points(&state.config));
    let rendered = render_map(&trajectories);

    Ok(Json(json!({
        "status": "ok",
        "records": view.records.len(),
        "selected": view.selection.len(),
        "rendered_points": rendered.rendered_points,
        "center": rendered.center.map(|(lat, lon)| json!([lat, lon])),
        "vessels": rendered.legend,
        "loaded_at": dataset.loaded_at.to_rfc3339(),
        "collection": serde_json::to_value(&rendered.collection).map_err(internal_error)?,
    })))
}

async fn vessels(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let dataset = snapshot(&state).await?;
    Ok(Json(json!({ "vessels": dataset.vessel_summaries() })))
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    limit: Option<usize>,
}

async fn preview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<Value>, ApiError> {
    let dataset = snapshot(&state).await?;

    let view = TrackFilter::from_config(&state.config.dashboard).apply(&dataset);
    let limit = query.limit.unwrap_or(20);
    Ok(Json(json!({ "records": preview_rows(&view.records, limit) })))
}

async fn sources(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let dataset = snapshot(&state).await?;
    Ok(Json(json!({ "sources": dataset.sources })))
}
