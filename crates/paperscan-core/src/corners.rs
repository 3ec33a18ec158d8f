//! Curvature-based corner search.
//!
//! Fallback used when the Douglas-Peucker epsilon sweep (`simplify.rs`)
//! fails to land on a 4-to-8-vertex approximation. Looks directly for the
//! sharpest turns along the contour instead of shrinking a distance
//! tolerance.

use crate::geometry::bounding_box;
use crate::types::Point;

struct Candidate {
    sample_index: usize,
    point: Point,
    curvature: f64,
}

/// Find up to `target` sharp-turn corners along `contour`.
///
/// Returns the selected points in selection (curvature-descending) order.
/// Returns an empty vector if `contour` has fewer than 8 points.
#[must_use = "returns the selected corner points"]
pub fn find_corners(contour: &[Point], target: usize) -> Vec<Point> {
    if contour.len() < 8 || target == 0 {
        return Vec::new();
    }

    let stride = (contour.len() / 100).max(1);
    let sampled: Vec<Point> = contour.iter().step_by(stride).copied().collect();
    let sample_count = sampled.len();
    if sample_count < 3 {
        return Vec::new();
    }

    let window = (sample_count / 20).max(3);
    let bbox = bounding_box(contour);
    let min_dimension = bbox.width.min(bbox.height);
    let min_separation = 0.2 * min_dimension;

    let mut candidates = Vec::with_capacity(sample_count);
    for i in 0..sample_count {
        let curr = sampled[i];
        let prev = sampled[(i + sample_count - window % sample_count) % sample_count];
        let next = sampled[(i + window) % sample_count];

        let v1 = (curr.x - prev.x, curr.y - prev.y);
        let v2 = (next.x - curr.x, next.y - curr.y);
        let len1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
        let len2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
        if len1 == 0.0 || len2 == 0.0 {
            continue;
        }

        let dot = v1.0 * v2.0 + v1.1 * v2.1;
        let cos_angle = (dot / (len1 * len2)).clamp(-1.0, 1.0);
        let curvature = std::f64::consts::PI - cos_angle.acos();

        candidates.push(Candidate {
            sample_index: i,
            point: curr,
            curvature,
        });
    }

    // Descending by curvature; ties broken by sample index ascending.
    candidates.sort_by(|a, b| {
        b.curvature
            .partial_cmp(&a.curvature)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.sample_index.cmp(&b.sample_index))
    });

    let mut selected: Vec<Point> = Vec::with_capacity(target);
    for candidate in &candidates {
        if selected.len() == target {
            break;
        }
        let too_close = selected
            .iter()
            .any(|&p| p.distance(candidate.point) < min_separation);
        if too_close {
            continue;
        }
        selected.push(candidate.point);
    }

    selected
}
