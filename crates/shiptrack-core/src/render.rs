use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use serde_json::json;

use crate::types::Trajectory;

/// Stroke palette cycled by selection-order index.
pub const PALETTE: [&str; 10] = [
    "blue",
    "green",
    "red",
    "purple",
    "orange",
    "darkblue",
    "lightgreen",
    "cadetblue",
    "darkred",
    "beige",
];

pub const START_MARKER_COLOR: &str = "green";
pub const END_MARKER_COLOR: &str = "red";

pub fn palette_color(selection_index: usize) -> &'static str {
    PALETTE[selection_index % PALETTE.len()]
}

/// One render pass over already-decimated trajectories.
#[derive(Debug)]
pub struct RenderedMap {
    pub collection: FeatureCollection,
    /// Arithmetic mean (lat, lon) of every rendered point; `None` when
    /// nothing is rendered.
    pub center: Option<(f64, f64)>,
    pub rendered_points: usize,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub vessel_id: String,
    pub color: &'static str,
    pub points: usize,
    pub total_points: usize,
}

/// Emit one line per multi-point trajectory plus start and end markers.
///
/// A single-point trajectory renders markers only; an empty one renders
/// nothing. Never panics on short input.
pub fn render_map(trajectories: &[Trajectory]) -> RenderedMap {
    let mut features = Vec::new();
    let mut legend = Vec::new();
    let mut lat_sum = 0.0;
    let mut lon_sum = 0.0;
    let mut rendered_points = 0usize;

    for trajectory in trajectories {
        if trajectory.points.is_empty() {
            continue;
        }

        let color = palette_color(trajectory.selection_index);
        legend.push(LegendEntry {
            vessel_id: trajectory.vessel_id.clone(),
            color,
            points: trajectory.points.len(),
            total_points: trajectory.total_points,
        });

        for point in &trajectory.points {
            lat_sum += point.lat;
            lon_sum += point.lon;
        }
        rendered_points += trajectory.points.len();

        if trajectory.points.len() >= 2 {
            features.push(track_feature(trajectory, color));
        }

        let first = &trajectory.points[0];
        let last = &trajectory.points[trajectory.points.len() - 1];
        features.push(marker_feature(trajectory, first, "start", START_MARKER_COLOR));
        features.push(marker_feature(trajectory, last, "end", END_MARKER_COLOR));
    }

    let center = if rendered_points > 0 {
        let n = rendered_points as f64;
        Some((lat_sum / n, lon_sum / n))
    } else {
        None
    };

    RenderedMap {
        collection: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        center,
        rendered_points,
        legend,
    }
}

fn track_feature(trajectory: &Trajectory, color: &'static str) -> Feature {
    let coordinates: Vec<Vec<f64>> = trajectory
        .points
        .iter()
        .map(|point| vec![point.lon, point.lat])
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("kind".to_string(), json!("track"));
    properties.insert("vessel_id".to_string(), json!(trajectory.vessel_id));
    properties.insert("color".to_string(), json!(color));
    properties.insert("points".to_string(), json!(trajectory.points.len()));
    properties.insert("total_points".to_string(), json!(trajectory.total_points));
    properties.insert(
        "tooltip".to_string(),
        json!(format!(
            "{} - {} pts",
            trajectory.vessel_id, trajectory.total_points
        )),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coordinates))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn marker_feature(
    trajectory: &Trajectory,
    point: &crate::types::Position,
    kind: &str,
    color: &'static str,
) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("kind".to_string(), json!(kind));
    properties.insert("vessel_id".to_string(), json!(trajectory.vessel_id));
    properties.insert("color".to_string(), json!(color));
    properties.insert("timestamp".to_string(), json!(point.timestamp.to_rfc3339()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![point.lon, point.lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Self-contained dashboard page: Leaflet map over CartoDB positron tiles,
/// re-fetching the track endpoint on the configured interval.
pub fn dashboard_html(refresh_secs: u64) -> String {
    DASHBOARD_TEMPLATE.replace("__REFRESH_SECS__", &refresh_secs.to_string())
}

/// Static one-shot page with the FeatureCollection embedded inline; no
/// endpoint, no refresh.
pub fn standalone_html(rendered: &RenderedMap) -> crate::Result<String> {
    let geojson = serde_json::to_string(&rendered.collection)?;
    let center = match rendered.center {
        Some((lat, lon)) => format!("[{lat}, {lon}]"),
        None => "null".to_string(),
    };
    Ok(STANDALONE_TEMPLATE
        .replace("__GEOJSON__", &geojson)
        .replace("__CENTER__", &center))
}

const STANDALONE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Ship Tracks</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  body { margin: 0; font-family: sans-serif; }
  #map { height: 100vh; }
</style>
</head>
<body>
<div id="map"></div>
<script>
const DATA = __GEOJSON__;
const CENTER = __CENTER__;
const map = L.map('map').setView(CENTER || [0, 0], CENTER ? 6 : 2);
L.tileLayer('https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png', {
  attribution: '&copy; OpenStreetMap contributors &copy; CARTO'
}).addTo(map);
L.geoJSON(DATA, {
  style: f => ({ color: f.properties.color, weight: 3 }),
  pointToLayer: (f, latlng) => L.circleMarker(latlng, {
    radius: 5, color: f.properties.color, fillOpacity: 0.8
  }),
  onEachFeature: (f, l) => {
    const p = f.properties;
    if (p.kind === 'track') {
      l.bindTooltip(p.tooltip);
    } else {
      l.bindPopup(p.kind.charAt(0).toUpperCase() + p.kind.slice(1) +
        '<br>' + p.vessel_id + '<br>' + p.timestamp);
    }
  }
}).addTo(map);
</script>
</body>
</html>
"#;

const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Ship Tracks</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  body { margin: 0; font-family: sans-serif; }
  #status { padding: 8px 12px; background: #f5f5f5; border-bottom: 1px solid #ddd; }
  #map { height: calc(100vh - 40px); }
</style>
</head>
<body>
<div id="status">Loading...</div>
<div id="map"></div>
<script>
const REFRESH_SECS = __REFRESH_SECS__;
const map = L.map('map').setView([0, 0], 2);
L.tileLayer('https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png', {
  attribution: '&copy; OpenStreetMap contributors &copy; CARTO'
}).addTo(map);
let layer = null;

async function load() {
  const status = document.getElementById('status');
  let body;
  try {
    const response = await fetch('/api/track.geojson' + window.location.search);
    body = await response.json();
    if (!response.ok) {
      status.textContent = body.message || 'Failed to load track data.';
      return;
    }
  } catch (err) {
    status.textContent = 'Failed to load track data: ' + err;
    return;
  }

  if (layer) { map.removeLayer(layer); }

  if (body.status === 'no data') {
    status.textContent = 'No data in selected date range / ships.';
    return;
  }

  status.textContent = 'Showing ' + body.records + ' records for ' +
    body.selected + ' vessel(s). Refreshed ' + new Date().toLocaleTimeString() + '.';

  layer = L.geoJSON(body.collection, {
    style: f => ({ color: f.properties.color, weight: 3 }),
    pointToLayer: (f, latlng) => L.circleMarker(latlng, {
      radius: 5, color: f.properties.color, fillOpacity: 0.8
    }),
    onEachFeature: (f, l) => {
      const p = f.properties;
      if (p.kind === 'track') {
        l.bindTooltip(p.tooltip);
      } else {
        l.bindPopup(p.kind.charAt(0).toUpperCase() + p.kind.slice(1) +
          '<br>' + p.vessel_id + '<br>' + p.timestamp);
      }
    }
  }).addTo(map);

  if (body.center) {
    map.setView([body.center[0], body.center[1]], 6);
  }
}

load();
setInterval(load, REFRESH_SECS * 1000);
</script>
</body>
</html>
"#;
