//! Top-level single-strategy orchestration: `detect`.
//!
//! Runs every stage described in `spec.md`'s component design once, in
//! order, and assembles the result. [`crate::strategy`] builds on top of
//! this as the unit of work `detect_enhanced` repeats with different
//! options.
//!
//! This crate does not replicate a typestate/incremental-recompute
//! pipeline builder: each call is independent and there is no persisted
//! state to invalidate, so a single straight-line function is the whole
//! orchestration layer.

use std::collections::BTreeMap;

use crate::classify;
use crate::contour::{ContourTracer, ContourTracerKind};
use crate::corners;
use crate::grayscale;
use crate::morphology;
use crate::simplify;
use crate::sobel;
use crate::threshold;
use crate::types::{
    DetectError, DetectOptions, DetectionResult, DetectionStats, IntermediateKey, Raster,
    PROCESSING_PIPELINE,
};

const THRESHOLD_BLOCK_SIZE: u32 = 15;
const THRESHOLD_C: i32 = 5;

/// Run the fixed-topology detection pipeline once against `raster` with
/// `options`, validating `options` first.
///
/// This is step-for-step the pipeline from `spec.md` §4: grayscale → blur
/// → Sobel magnitude + adaptive threshold → OR-combine → morphological
/// close → Moore-neighbor contour trace → per-contour filter →
/// Douglas-Peucker epsilon sweep (falling back to curvature corner search)
/// → vertex ordering → overlap suppression → classification.
pub fn detect(raster: &Raster, options: &DetectOptions) -> Result<DetectionResult, DetectError> {
    options.validate()?;
    run_single(raster, options)
}

/// The single-run worker shared by [`detect`] and the strategy runner in
/// [`crate::strategy`]. Does not re-validate `options`; callers are
/// expected to have done so already.
pub(crate) fn run_single(
    raster: &Raster,
    options: &DetectOptions,
) -> Result<DetectionResult, DetectError> {
    let width = raster.width();
    let height = raster.height();

    log::debug!("detect: {width}x{height} raster, options={options:?}");

    let gray = grayscale::to_grayscale(raster);
    let blurred = crate::blur::gaussian_blur(&gray, options.blur_radius);
    let edges = sobel::sobel_magnitude(&blurred);
    let threshold_mask = threshold::adaptive_mean_threshold(&blurred, THRESHOLD_BLOCK_SIZE, THRESHOLD_C);
    let combined = threshold::combine(&edges, &threshold_mask, options.edge_threshold);
    let processed = morphology::close(&combined);

    let tracer = ContourTracerKind::default();
    let raw_contours = tracer.trace(&processed);
    log::debug!("detect: traced {} candidate contour(s)", raw_contours.len());

    let image_area = f64::from(width) * f64::from(height);
    let mut boundaries = Vec::new();

    for raw_contour in &raw_contours {
        if !classify::passes_prefilter(
            raw_contour,
            image_area,
            options.min_area_ratio,
            options.max_area_ratio,
        ) {
            continue;
        }

        let approx = if let Some(points) = simplify::adaptive_epsilon_sweep(raw_contour) {
            points
        } else {
            let corner_points = corners::find_corners(raw_contour, 4);
            if corner_points.len() != 4 {
                continue;
            }
            corner_points
        };

        if approx.len() < 4 || approx.len() > 8 {
            continue;
        }

        let mut ordered = approx;
        classify::order_quadrilateral(&mut ordered);

        if let Some(boundary) = classify::build_boundary(ordered) {
            boundaries.push(boundary);
        }
    }

    let mut boundaries = classify::suppress_overlaps(boundaries);
    classify::classify(&mut boundaries);

    let mut intermediate = BTreeMap::new();
    intermediate.insert(IntermediateKey::Grayscale, gray);
    intermediate.insert(IntermediateKey::Edges, edges);
    intermediate.insert(IntermediateKey::Threshold, threshold_mask.into_gray());
    intermediate.insert(IntermediateKey::Processed, processed.into_gray());

    let stats = DetectionStats {
        total_detected: boundaries.len(),
        processing_pipeline: PROCESSING_PIPELINE,
        strategies_attempted: 1,
        strategies_failed: 0,
    };

    log::info!("detect: {} boundary/boundaries found", boundaries.len());

    Ok(DetectionResult {
        boundaries,
        intermediate,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Raster;

    fn solid_raster(width: u32, height: u32, r: u8, g: u8, b: u8) -> Raster {
        let mut pixels = Vec::with_capacity(4 * width as usize * height as usize);
        for _ in 0..(width * height) {
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
        Raster::new(width, height, pixels).unwrap()
    }

    fn raster_with_black_rect(
        width: u32,
        height: u32,
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
    ) -> Raster {
        let mut pixels = vec![255u8; 4 * width as usize * height as usize];
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = 4 * (y as usize * width as usize + x as usize);
                pixels[idx] = 0;
                pixels[idx + 1] = 0;
                pixels[idx + 2] = 0;
                pixels[idx + 3] = 255;
            }
        }
        Raster::new(width, height, pixels).unwrap()
    }

    #[test]
    fn uniform_gray_image_has_no_boundaries() {
        let raster = solid_raster(200, 200, 128, 128, 128);
        let result = detect(&raster, &DetectOptions::default()).unwrap();
        assert!(result.boundaries.is_empty());
        assert!(result
            .intermediate
            .get(&IntermediateKey::Edges)
            .unwrap()
            .data()
            .iter()
            .all(|&v| v == 0));
        assert!(result
            .intermediate
            .get(&IntermediateKey::Threshold)
            .unwrap()
            .data()
            .iter()
            .all(|&v| v == 0));
    }

    #[test]
    fn single_black_rectangle_is_detected() {
        let raster = raster_with_black_rect(400, 300, 50, 50, 350, 250);
        let result = detect(&raster, &DetectOptions::default()).unwrap();
        assert_eq!(result.boundaries.len(), 1);
        let boundary = &result.boundaries[0];
        assert_eq!(boundary.num_vertices, 4);
        assert!(boundary.is_convex);
        assert_eq!(boundary.kind, crate::types::BoundaryKind::SingleDocument);
    }

    #[test]
    fn tiny_raster_returns_empty_without_crashing() {
        let raster = Raster::new(1, 1, vec![0, 0, 0, 255]).unwrap();
        let result = detect(&raster, &DetectOptions::default()).unwrap();
        assert!(result.boundaries.is_empty());
    }

    #[test]
    fn inverted_area_range_is_rejected_before_any_work() {
        let raster = raster_with_black_rect(400, 300, 50, 50, 350, 250);
        let options = DetectOptions {
            min_area_ratio: 0.9,
            max_area_ratio: 0.1,
            ..Default::default()
        };
        let err = detect(&raster, &options).unwrap_err();
        assert!(matches!(err, DetectError::InvalidInput(_)));
    }

    #[test]
    fn extreme_aspect_strip_is_rejected() {
        let raster = raster_with_black_rect(1000, 50, 10, 10, 990, 40);
        let result = detect(&raster, &DetectOptions::default()).unwrap();
        assert!(result.boundaries.is_empty());
    }
}
