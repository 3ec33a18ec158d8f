//! Boundary contour tracing.
//!
//! This is step 6 in the pipeline: turning the processed binary mask into
//! ordered point sequences tracing the outer edge of each connected white
//! region, ready for polygon approximation.

use crate::types::{Contour, Mask, Point};

/// Clockwise neighbor offsets starting at "east", indexed `0..8`.
const DIRECTIONS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Selects which contour-tracing algorithm is used.
///
/// A single variant today; kept as an enum-selected strategy (rather than a
/// bare function) so an alternative tracer can be added later without
/// changing callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContourTracerKind {
    /// Moore-neighbor boundary following with 8-connectivity.
    #[default]
    MooreNeighbor,
}

/// A pluggable contour-tracing strategy.
pub trait ContourTracer {
    /// Trace the outer boundaries of every connected white region in
    /// `mask`, discarding any trace shorter than 20 points.
    fn trace(&self, mask: &Mask) -> Vec<Contour>;
}

impl ContourTracer for ContourTracerKind {
    fn trace(&self, mask: &Mask) -> Vec<Contour> {
        match self {
            Self::MooreNeighbor => moore_neighbor_trace(mask),
        }
    }
}

const MIN_CONTOUR_POINTS: usize = 20;

/// Trace contours using Moore-neighbor boundary following.
///
/// Scans `(1,1)..(W-2,H-2)` in row-major order (the one-pixel border frame
/// never starts a trace). A pixel starts a new trace when it is
/// foreground, unvisited, and its left neighbor is background — i.e. it is
/// the left edge of a white region. This means the scanner only picks up
/// one trace per connected region's left-edge crossing; shapes that touch
/// the image's left border can be missed. That miss is intentional and
/// matches the reference behavior this pipeline is specified against.
#[must_use = "returns the traced contours"]
pub fn moore_neighbor_trace(mask: &Mask) -> Vec<Contour> {
    let width = mask.width();
    let height = mask.height();
    if width < 3 || height < 3 {
        return Vec::new();
    }

    let mut visited = vec![false; width as usize * height as usize];
    let mut contours = Vec::new();
    let budget = width as u64 * height as u64;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let idx = y as usize * width as usize + x as usize;
            if !mask.is_set(x, y) || visited[idx] {
                continue;
            }
            if mask.is_set(x - 1, y) {
                continue;
            }

            let contour = trace_one(mask, &mut visited, x, y, width, height, budget);
            if contour.len() >= MIN_CONTOUR_POINTS {
                contours.push(contour);
            }
        }
    }

    contours
}

#[allow(clippy::too_many_arguments)]
fn trace_one(
    mask: &Mask,
    visited: &mut [bool],
    start_x: u32,
    start_y: u32,
    width: u32,
    height: u32,
    budget: u64,
) -> Contour {
    let mut contour = Vec::new();
    let (start_x, start_y) = (i64::from(start_x), i64::from(start_y));
    let (mut cx, mut cy) = (start_x, start_y);
    let mut direction = 0usize;

    let mark = |visited: &mut [bool], x: i64, y: i64| {
        let idx = (y as u32 as usize) * width as usize + (x as u32 as usize);
        visited[idx] = true;
    };

    contour.push(Point::new(cx as f64, cy as f64));
    mark(visited, cx, cy);

    let mut steps = 0u64;
    loop {
        steps += 1;
        if steps > budget {
            return Vec::new();
        }

        let search_start = (direction + 6) % 8;
        let mut found = None;
        for step in 0..8 {
            let dir_idx = (search_start + step) % 8;
            let (dx, dy) = DIRECTIONS[dir_idx];
            let (nx, ny) = (cx + dx, cy + dy);
            if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
                continue;
            }
            if mask.is_set(nx as u32, ny as u32) {
                found = Some((nx, ny, dir_idx));
                break;
            }
        }

        let Some((nx, ny, dir_idx)) = found else {
            break;
        };

        mark(visited, nx, ny);
        direction = dir_idx;
        cx = nx;
        cy = ny;

        if cx == start_x && cy == start_y {
            break;
        }
        contour.push(Point::new(cx as f64, cy as f64));
    }

    contour
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GrayBuffer;

    fn rect_mask(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> Mask {
        let mut data = vec![0u8; (width * height) as usize];
        for y in y0..=y1 {
            for x in x0..=x1 {
                let on_border = x == x0 || x == x1 || y == y0 || y == y1;
                if on_border {
                    data[(y * width + x) as usize] = 255;
                }
            }
        }
        Mask::from_binary(GrayBuffer::from_raw(width, height, data))
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let mask = Mask::from_binary(GrayBuffer::from_raw(20, 20, vec![0u8; 400]));
        let contours = moore_neighbor_trace(&mask);
        assert!(contours.is_empty());
    }

    #[test]
    fn too_small_mask_has_no_contours() {
        let mask = Mask::from_binary(GrayBuffer::from_raw(2, 2, vec![255u8; 4]));
        let contours = moore_neighbor_trace(&mask);
        assert!(contours.is_empty());
    }

    #[test]
    fn traces_rectangle_outline() {
        let mask = rect_mask(40, 40, 5, 5, 34, 34);
        let contours = moore_neighbor_trace(&mask);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].len() >= MIN_CONTOUR_POINTS);
    }

    #[test]
    fn short_trace_is_discarded() {
        // A tiny 3x3 ring is far fewer than 20 points once traced.
        let mask = rect_mask(20, 20, 8, 8, 10, 10);
        let contours = moore_neighbor_trace(&mask);
        assert!(contours.is_empty());
    }

    #[test]
    fn left_edge_touching_shape_is_missed() {
        // A rectangle whose left edge sits at the image border (x=0) has
        // no unscanned background column to its left, so every pixel the
        // scanner reaches at x=1 already has a foreground left neighbor.
        // No trace ever starts. This mirrors the documented left-edge
        // scanning limitation.
        let mask = rect_mask(40, 40, 0, 5, 30, 34);
        let contours = moore_neighbor_trace(&mask);
        assert!(contours.is_empty());
    }

    #[test]
    fn contour_tracer_kind_default_is_moore_neighbor() {
        assert_eq!(ContourTracerKind::default(), ContourTracerKind::MooreNeighbor);
    }
}
