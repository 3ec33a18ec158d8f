//! Candidate filtering, vertex ordering, overlap suppression, and
//! book-spread/document classification.
//!
//! This is step 8 in the pipeline, turning approximated polygons into the
//! final, labelled [`Boundary`] list.

use crate::geometry::{area, bbox_iou, bounding_box, is_convex};
use crate::types::{Boundary, BoundaryKind, Point};

/// Area and aspect-ratio filter applied to a raw contour *before*
/// polygon approximation.
///
/// Rejects contours whose area falls outside
/// `[min_area_ratio, max_area_ratio] * image_area`, or whose bounding-box
/// aspect ratio falls outside `[0.3, 3.5]`. A zero-height bounding box is
/// rejected (would divide by zero).
#[must_use]
pub fn passes_prefilter(contour: &[Point], image_area: f64, min_area_ratio: f64, max_area_ratio: f64) -> bool {
    let contour_area = area(contour);
    if contour_area < min_area_ratio * image_area || contour_area > max_area_ratio * image_area {
        return false;
    }
    let bbox = bounding_box(contour);
    if bbox.height == 0.0 {
        return false;
    }
    let aspect_ratio = bbox.width / bbox.height;
    (0.3..=3.5).contains(&aspect_ratio)
}

/// Reorder a 4-point polygon so it starts from the vertex with minimum
/// `x + y`, proceeding counterclockwise around the centroid.
///
/// Does nothing if `points.len() != 4`.
pub fn order_quadrilateral(points: &mut Vec<Point>) {
    if points.len() != 4 {
        return;
    }

    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;

    points.sort_by(|a, b| {
        let angle_a = (a.y - cy).atan2(a.x - cx);
        let angle_b = (b.y - cy).atan2(b.x - cx);
        angle_a.partial_cmp(&angle_b).unwrap_or(std::cmp::Ordering::Equal)
    });

    let min_idx = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (a.x + a.y).partial_cmp(&(b.x + b.y)).unwrap_or(std::cmp::Ordering::Equal))
        .map_or(0, |(i, _)| i);
    points.rotate_left(min_idx);
}

/// Build a [`Boundary`] from a final, already-ordered polygon.
///
/// Returns `None` if the polygon has fewer than 4 or more than 8 vertices.
/// The returned boundary's `kind` is always [`BoundaryKind::Document`];
/// callers run [`classify`] afterward to assign the final label.
#[must_use]
pub fn build_boundary(points: Vec<Point>) -> Option<Boundary> {
    if points.len() < 4 || points.len() > 8 {
        return None;
    }
    let bounding_rect = bounding_box(&points);
    if bounding_rect.height == 0.0 {
        return None;
    }
    let aspect_ratio = bounding_rect.width / bounding_rect.height;
    let boundary_area = area(&points);
    let is_convex_poly = is_convex(&points);
    let num_vertices = points.len();

    Some(Boundary {
        points,
        area: boundary_area,
        aspect_ratio,
        num_vertices,
        bounding_rect,
        is_convex: is_convex_poly,
        kind: BoundaryKind::Document,
    })
}

/// Sort boundaries by area descending (ties broken by original/insertion
/// order) and drop any boundary whose bounding-box IoU against an
/// already-accepted boundary exceeds `0.5`.
#[must_use]
pub fn suppress_overlaps(boundaries: Vec<Boundary>) -> Vec<Boundary> {
    let mut indexed: Vec<(usize, Boundary)> = boundaries.into_iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        b.area
            .partial_cmp(&a.area)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(ia.cmp(ib))
    });
    let sorted: Vec<Boundary> = indexed.into_iter().map(|(_, b)| b).collect();

    let mut suppressed = vec![false; sorted.len()];
    let mut result = Vec::with_capacity(sorted.len());
    for i in 0..sorted.len() {
        if suppressed[i] {
            continue;
        }
        for j in (i + 1)..sorted.len() {
            if suppressed[j] {
                continue;
            }
            if bbox_iou(&sorted[i].bounding_rect, &sorted[j].bounding_rect) > 0.5 {
                suppressed[j] = true;
            }
        }
        result.push(sorted[i].clone());
    }

    result
}

/// Assign the final `kind` to every boundary in `boundaries`.
///
/// A single surviving boundary is `single-document`. Otherwise, adjacent
/// boundaries (sorted left-to-right) with a small horizontal gap and
/// similar height are labelled as a book spread; everything else is
/// `document`.
pub fn classify(boundaries: &mut [Boundary]) {
    if boundaries.len() == 1 {
        boundaries[0].kind = BoundaryKind::SingleDocument;
        return;
    }
    for boundary in boundaries.iter_mut() {
        boundary.kind = BoundaryKind::Document;
    }
    if boundaries.len() < 2 {
        return;
    }

    let mut order: Vec<usize> = (0..boundaries.len()).collect();
    order.sort_by(|&a, &b| {
        boundaries[a]
            .bounding_rect
            .x
            .partial_cmp(&boundaries[b].bounding_rect.x)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for pair in order.windows(2) {
        let (left_idx, right_idx) = (pair[0], pair[1]);
        let left_rect = boundaries[left_idx].bounding_rect;
        let right_rect = boundaries[right_idx].bounding_rect;

        let gap = right_rect.x - (left_rect.x + left_rect.width);
        let avg_width = (left_rect.width + right_rect.width) / 2.0;
        let height_diff = (left_rect.height - right_rect.height).abs();
        let avg_height = (left_rect.height + right_rect.height) / 2.0;

        if gap < 0.3 * avg_width && height_diff < 0.3 * avg_height {
            boundaries[left_idx].kind = BoundaryKind::BookSpreadLeft;
            boundaries[right_idx].kind = BoundaryKind::BookSpreadRight;
        }
    }
}
