//! Deterministic document-boundary detection.
//!
//! Given a decoded raster image, this crate locates the convex
//! quadrilateral (or near-quadrilateral) outlines of documents, book
//! pages, or paper sheets visible in it, using a fixed-topology classical
//! image-processing pipeline: grayscale conversion, Gaussian blur, Sobel
//! edge magnitude, adaptive mean threshold, morphological closing,
//! Moore-neighbor contour tracing, Douglas-Peucker polygon simplification
//! (with a curvature-based corner-search fallback), and candidate
//! filtering/classification.
//!
//! The crate is sans-IO: it has no knowledge of image file formats,
//! networking, or rendering. Callers decode an image into a [`Raster`]
//! themselves and do whatever they like with the returned
//! [`DetectionResult`]. There is no shared state between calls — every
//! [`detect`]/[`detect_enhanced`] invocation is independent and safe to
//! run concurrently on separate threads against separate inputs.
//!
//! ```
//! use paperscan_core::{detect, DetectOptions, Raster};
//!
//! let width = 10;
//! let height = 10;
//! let pixels = vec![255u8; 4 * width as usize * height as usize];
//! let raster = Raster::new(width, height, pixels).unwrap();
//! let result = detect(&raster, &DetectOptions::default()).unwrap();
//! assert!(result.boundaries.is_empty());
//! ```

pub mod blur;
pub mod classify;
pub mod contour;
pub mod corners;
pub mod geometry;
pub mod grayscale;
pub mod morphology;
pub mod pipeline;
pub mod simplify;
pub mod sobel;
pub mod strategy;
pub mod threshold;
pub mod types;

pub use pipeline::detect;
pub use strategy::detect_enhanced;
pub use types::{
    Boundary, BoundaryKind, BoundingBox, Contour, DetectError, DetectOptions, DetectionResult,
    DetectionStats, GrayBuffer, IntermediateKey, Mask, Point, Raster, PROCESSING_PIPELINE,
};
