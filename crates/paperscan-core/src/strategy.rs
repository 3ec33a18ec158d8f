//! Multi-strategy detection: `detect_enhanced`.
//!
//! Runs a fixed, ordered list of option overrides over the single-pass
//! pipeline in [`crate::pipeline`], stopping early at the first run that
//! finds a 4-vertex boundary and otherwise keeping the best of the rest.

use std::collections::BTreeMap;

use crate::pipeline::run_single;
use crate::types::{
    DetectError, DetectOptions, DetectionResult, DetectionStats, StrategyFailed,
    PROCESSING_PIPELINE,
};

struct Strategy {
    label: &'static str,
    apply: fn(&DetectOptions) -> DetectOptions,
}

const STRATEGIES: [Strategy; 4] = [
    Strategy {
        label: "base",
        apply: |base| base.clone(),
    },
    Strategy {
        label: "low-threshold-small-area",
        apply: |base| DetectOptions {
            edge_threshold: 30,
            min_area_ratio: 0.03,
            ..base.clone()
        },
    },
    Strategy {
        label: "high-threshold-wide-blur",
        apply: |base| DetectOptions {
            edge_threshold: 70,
            blur_radius: 3,
            ..base.clone()
        },
    },
    Strategy {
        label: "wide-area-range",
        apply: |base| DetectOptions {
            min_area_ratio: 0.01,
            max_area_ratio: 0.98,
            ..base.clone()
        },
    },
];

/// Run the pipeline once per fixed strategy override, returning the first
/// result containing a 4-vertex boundary, or otherwise the result with the
/// most 4-vertex boundaries (ties broken by the earliest strategy tried,
/// then by total boundary count).
///
/// `base_options` is validated once, up front; an invalid base is a
/// caller error and surfaces immediately, matching [`crate::detect`]. A
/// strategy whose merged options or pipeline run fails is logged and
/// skipped — per-strategy failures never propagate to the caller.
pub fn detect_enhanced(
    raster: &crate::types::Raster,
    base_options: &DetectOptions,
) -> Result<DetectionResult, DetectError> {
    base_options.validate()?;

    let mut best: Option<(usize, usize, DetectionResult)> = None;

    for strategy in &STRATEGIES {
        let merged = (strategy.apply)(base_options);
        match attempt(raster, &merged, strategy.label) {
            Ok(result) => {
                let four_vertex_count = result.boundaries.iter().filter(|b| b.num_vertices == 4).count();
                if four_vertex_count >= 1 {
                    log::info!(
                        "detect_enhanced: strategy `{}` produced {} 4-vertex boundary/boundaries, stopping early",
                        strategy.label,
                        four_vertex_count
                    );
                    return Ok(result);
                }

                let total = result.boundaries.len();
                let should_replace = match &best {
                    None => true,
                    Some((best_four, best_total, _)) => {
                        four_vertex_count > *best_four
                            || (four_vertex_count == *best_four && total > *best_total)
                    }
                };
                if should_replace {
                    best = Some((four_vertex_count, total, result));
                }
            }
            Err(StrategyFailed::NoCandidates) => {
                // already logged inside `attempt`; nothing more to do.
            }
        }
    }

    Ok(best.map_or_else(empty_result, |(_, _, result)| result))
}

fn attempt(
    raster: &crate::types::Raster,
    options: &DetectOptions,
    label: &str,
) -> Result<DetectionResult, StrategyFailed> {
    match run_single(raster, options) {
        Ok(result) => Ok(result),
        Err(err) => {
            log::warn!("detect_enhanced: strategy `{label}` failed: {err}");
            Err(StrategyFailed::NoCandidates)
        }
    }
}

fn empty_result() -> DetectionResult {
    DetectionResult {
        boundaries: Vec::new(),
        intermediate: BTreeMap::new(),
        stats: DetectionStats {
            total_detected: 0,
            processing_pipeline: PROCESSING_PIPELINE,
            strategies_attempted: STRATEGIES.len() as u8,
            strategies_failed: STRATEGIES.len() as u8,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Raster;

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
    fn finds_rectangle_on_first_strategy() {
        let raster = raster_with_black_rect(400, 300, 50, 50, 350, 250);
        let result = detect_enhanced(&raster, &DetectOptions::default()).unwrap();
        assert_eq!(result.boundaries.len(), 1);
        assert_eq!(result.boundaries[0].num_vertices, 4);
    }

    #[test]
    fn all_strategies_failing_to_find_a_quad_returns_populated_intermediates() {
        // A uniform gray raster never produces any boundary under any
        // strategy override, but the returned intermediates must still
        // come from some run.
        let mut pixels = Vec::with_capacity(4 * 200 * 200);
        for _ in 0..(200 * 200) {
            pixels.extend_from_slice(&[128, 128, 128, 255]);
        }
        let raster = Raster::new(200, 200, pixels).unwrap();
        let result = detect_enhanced(&raster, &DetectOptions::default()).unwrap();
        assert!(result.boundaries.is_empty());
        assert!(!result.intermediate.is_empty());
    }

    #[test]
    fn invalid_base_options_surface_immediately() {
        let raster = raster_with_black_rect(400, 300, 50, 50, 350, 250);
        let options = DetectOptions {
            min_area_ratio: 0.9,
            max_area_ratio: 0.1,
            ..Default::default()
        };
        assert!(detect_enhanced(&raster, &options).is_err());
    }
}
