use std::collections::HashMap;

use crate::filter::FilteredView;
use crate::types::{Position, Trajectory};

/// Partition a filtered view into per-vessel trajectories in selection
/// order, sort each by timestamp, and decimate to the point budget.
///
/// The sort is stable, so records with equal timestamps keep their input
/// order. Vessels that matched no records produce no trajectory but still
/// consume their selection index.
pub fn build_trajectories(view: &FilteredView, max_points: usize) -> Vec<Trajectory> {
    let mut by_vessel: HashMap<&str, Vec<Position>> = HashMap::new();
    for record in &view.records {
        by_vessel
            .entry(record.vessel_id.as_str())
            .or_default()
            .push(record.clone());
    }

    let mut trajectories = Vec::new();
    for (selection_index, vessel_id) in view.selection.iter().enumerate() {
        let Some(mut points) = by_vessel.remove(vessel_id.as_str()) else {
            continue;
        };
        points.sort_by_key(|point| point.timestamp);

        let total_points = points.len();
        let points = decimate(&points, max_points);

        trajectories.push(Trajectory {
            vessel_id: vessel_id.clone(),
            selection_index,
            points,
            total_points,
        });
    }
    trajectories
}

/// Deterministic stride subsampling: keep every stride-th point starting at
/// index 0, stride = max(1, n / max_points). The output has ceil(n / stride)
/// points, which can exceed `max_points`; with n <= max_points every point
/// is kept.
pub fn decimate(points: &[Position], max_points: usize) -> Vec<Position> {
    let stride = stride_for(points.len(), max_points);
    points.iter().step_by(stride).cloned().collect()
}

pub fn stride_for(n: usize, max_points: usize) -> usize {
    if max_points == 0 {
        return 1;
    }
    (n / max_points).max(1)
}
