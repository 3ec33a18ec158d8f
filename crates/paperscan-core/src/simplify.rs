//! Polygon approximation: Douglas-Peucker simplification and the adaptive
//! epsilon sweep that picks a tolerance per contour.
//!
//! This is step 7 in the pipeline, between contour tracing and candidate
//! filtering/classification.

use crate::geometry::{perimeter, point_to_segment_distance};
use crate::types::Point;

/// Simplify `points` with the Ramer-Douglas-Peucker algorithm at tolerance
/// `epsilon`.
///
/// The point sequence is treated as an open polyline from the first to the
/// last point; the closing edge back to the first point is implicit and
/// not considered during simplification. A degenerate input (fewer than 3
/// points) is returned unchanged.
///
/// Implemented iteratively with an explicit stack rather than recursion,
/// so contours with thousands of points cannot overflow the call stack.
#[must_use = "returns the simplified points"]
pub fn douglas_peucker(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let a = points[start];
        let b = points[end];
        let mut max_dist = 0.0f64;
        let mut max_idx = start;
        for (i, &p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = point_to_segment_distance(p, a, b);
            if d > max_dist {
                max_dist = d;
                max_idx = i;
            }
        }
        if max_dist > epsilon {
            keep[max_idx] = true;
            stack.push((start, max_idx));
            stack.push((max_idx, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Try a fixed sweep of epsilon factors (`{0.01, 0.02, 0.03, 0.04, 0.05}`
/// times the contour perimeter) and accept a result by priority:
///
/// 1. The first factor (in increasing order) that yields exactly 4 vertices
///    wins immediately.
/// 2. Otherwise, among factors whose vertex count falls in `[4, 8]`, keep
///    the one closest to 4 vertices, ties broken by whichever was tried
///    first.
/// 3. Otherwise, return `None` — the caller should fall back to curvature
///    corner search.
#[must_use = "returns the swept simplification, if any factor qualified"]
pub fn adaptive_epsilon_sweep(contour: &[Point]) -> Option<Vec<Point>> {
    const FACTORS: [f64; 5] = [0.01, 0.02, 0.03, 0.04, 0.05];
    let perim = perimeter(contour);

    let mut best: Option<(usize, Vec<Point>)> = None;
    for &factor in &FACTORS {
        let epsilon = factor * perim;
        let simplified = douglas_peucker(contour, epsilon);
        let count = simplified.len();

        if count == 4 {
            return Some(simplified);
        }

        if (4..=8).contains(&count) {
            let distance = count.abs_diff(4);
            let better = match &best {
                None => true,
                Some((best_distance, _)) => distance < *best_distance,
            };
            if better {
                best = Some((distance, simplified));
            }
        }
    }

    best.map(|(_, points)| points)
}
