//! Polygon and rectangle geometry.
//!
//! Hand-rolled rather than pulled from a general-purpose geometry crate:
//! these are a screen each, and the overlap-suppression tie-breaking rules
//! need exact control over how area and IoU are computed.

use crate::types::{BoundingBox, Point};

/// Polygon area via the shoelace formula.
///
/// Returns `0.0` for fewer than 3 points. The closing edge (last point back
/// to the first) is implicit.
#[must_use]
pub fn area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    (sum / 2.0).abs()
}

/// Polygon perimeter: sum of Euclidean distances between consecutive
/// points, wrapping last back to first.
#[must_use]
pub fn perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0f64;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        total += a.distance(b);
    }
    total
}

/// Axis-aligned bounding box of a point sequence.
///
/// # Panics
///
/// Panics if `points` is empty.
#[must_use]
pub fn bounding_box(points: &[Point]) -> BoundingBox {
    let first = points[0];
    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

/// Euclidean distance from `p` to the segment `a`-`b`, clamping the
/// parametric projection to `[0, 1]`.
///
/// A degenerate (zero-length) segment returns the distance to `a`.
#[must_use]
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx.mul_add(dx, dy * dy);
    if length_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq;
    let t_clamped = t.clamp(0.0, 1.0);
    let proj = Point::new(a.x + t_clamped * dx, a.y + t_clamped * dy);
    p.distance(proj)
}

/// `true` if the polygon is convex: the signed cross product of every pair
/// of consecutive edges agrees in sign (zero cross products, i.e.
/// collinear edges, are ignored).
#[must_use]
pub fn is_convex(points: &[Point]) -> bool {
    if points.len() < 4 {
        return points.len() == 3;
    }
    let n = points.len();
    let mut sign = 0.0f64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let e1 = (b.x - a.x, b.y - a.y);
        let e2 = (c.x - b.x, c.y - b.y);
        let cross = e1.0 * e2.1 - e1.1 * e2.0;
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Intersection-over-union of two axis-aligned bounding boxes.
///
/// Returns `0.0` when the boxes are disjoint or either has non-positive
/// area.
#[must_use]
pub fn bbox_iou(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let ix = a.x.max(b.x);
    let iy = a.y.max(b.y);
    let iw = (a.x + a.width).min(b.x + b.width) - ix;
    let ih = (a.y + a.height).min(b.y + b.height) - iy;
    if iw <= 0.0 || ih <= 0.0 {
        return 0.0;
    }
    let intersection = iw * ih;
    let union = a.area() + b.area() - intersection;
    if union <= 0.0 {
        0.0
    } else {
        intersection / union
    }
}
