//! Shared types for the document-boundary detection pipeline.

use std::collections::BTreeMap;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// A decoded raster image in row-major, top-left-origin RGBA8 layout.
///
/// This is the crate's only input type; decoding compressed image formats
/// (PNG, JPEG, ...) into this shape is the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Build a raster from raw RGBA8 pixel bytes.
    ///
    /// `width` and `height` must both be positive, and `pixels` must have
    /// exactly `4 * width * height` bytes. Returns
    /// [`DetectError::InvalidInput`] otherwise.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DetectError> {
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidInput(
                "raster width and height must both be positive".to_string(),
            ));
        }
        let expected = 4usize
            .checked_mul(width as usize)
            .and_then(|n| n.checked_mul(height as usize))
            .ok_or_else(|| DetectError::InvalidInput("raster dimensions overflow".to_string()))?;
        if pixels.len() != expected {
            return Err(DetectError::InvalidInput(format!(
                "expected {expected} bytes for a {width}x{height} RGBA raster, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA8 pixel bytes, row-major from the top-left.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The RGBA8 sample at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = 4 * (y as usize * self.width as usize + x as usize);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

/// A single-channel image buffer, one byte per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl GrayBuffer {
    /// Build a buffer of the given dimensions, filled with `fill`.
    ///
    /// Returns [`DetectError::OutOfMemory`] if the backing allocation fails.
    pub fn try_new(width: u32, height: u32, fill: u8) -> Result<Self, DetectError> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| DetectError::OutOfMemory("buffer size overflow".to_string()))?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| DetectError::OutOfMemory(e.to_string()))?;
        data.resize(len, fill);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer directly from pre-filled data. `data.len()` must equal
    /// `width * height`.
    #[must_use]
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The raw single-channel bytes, row-major from the top-left.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Sample at `(x, y)`, clamped to the buffer bounds (clamp-to-edge).
    #[must_use]
    pub fn get_clamped(&self, x: i64, y: i64) -> u8 {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.data[(cy as usize * self.width as usize) + cx as usize]
    }

    /// Sample at `(x, y)` with no bounds check. Caller must guarantee
    /// `x < width` and `y < height`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Write `value` at `(x, y)`. Caller must guarantee `x < width` and
    /// `y < height`.
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = value;
    }

    /// Returns `true` if `(x, y)` lies within the buffer.
    #[must_use]
    pub const fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}

/// A [`GrayBuffer`] known to hold only the values `0` and `255`.
///
/// Produced only by the threshold, combine and morphology stages, which are
/// the only code in this crate trusted to uphold that invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask(pub(crate) GrayBuffer);

impl Mask {
    /// Wrap a buffer already known to be binary. Only used internally by
    /// the stages that produce binary output.
    pub(crate) const fn from_binary(buffer: GrayBuffer) -> Self {
        Self(buffer)
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.0.width()
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.0.height()
    }

    /// `true` if the pixel at `(x, y)` is foreground (255).
    #[must_use]
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.0.get(x, y) != 0
    }

    /// View the mask as a plain [`GrayBuffer`].
    #[must_use]
    pub const fn as_gray(&self) -> &GrayBuffer {
        &self.0
    }

    /// Unwrap into the underlying [`GrayBuffer`].
    #[must_use]
    pub fn into_gray(self) -> GrayBuffer {
        self.0
    }
}

/// A closed sequence of boundary points traced from a mask, in raw
/// pixel-grid form before simplification.
pub type Contour = Vec<Point>;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl BoundingBox {
    /// Area of the box.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Classification assigned to a detected boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryKind {
    /// A single document page filling most of the candidate region.
    SingleDocument,
    /// A generic document-shaped boundary (used by `detect`, which does
    /// not attempt book-spread classification).
    Document,
    /// The left page of an open book/magazine spread.
    BookSpreadLeft,
    /// The right page of an open book/magazine spread.
    BookSpreadRight,
}

/// A detected document boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Ordered polygon vertices (4 for the common case, up to 8 otherwise).
    pub points: Vec<Point>,
    /// Polygon area in square pixels (shoelace formula).
    pub area: f64,
    /// Bounding-rectangle aspect ratio (`width / height`).
    pub aspect_ratio: f64,
    /// Number of vertices in `points`.
    pub num_vertices: usize,
    /// Axis-aligned bounding rectangle.
    pub bounding_rect: BoundingBox,
    /// Whether the polygon is convex.
    pub is_convex: bool,
    /// The classification assigned during candidate filtering.
    pub kind: BoundaryKind,
}

/// Key identifying one of the named intermediate buffers returned in a
/// [`DetectionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntermediateKey {
    /// Grayscale conversion of the input raster.
    Grayscale,
    /// Raw Sobel gradient magnitude of the blurred grayscale buffer, before
    /// it is combined with the adaptive threshold mask.
    Edges,
    /// Adaptive mean threshold mask of the blurred grayscale buffer, before
    /// it is OR-combined with the edge mask and before morphology.
    Threshold,
    /// The OR-combined edge/threshold mask after the morphological close
    /// (`dilate(r=2)` then `erode(r=1)`); the mask contour tracing runs on.
    Processed,
}

/// Per-run diagnostic counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DetectionStats {
    /// Number of boundaries returned.
    pub total_detected: usize,
    /// The fixed, ordered list of pipeline stage names this run executed.
    pub processing_pipeline: [&'static str; 6],
    /// Number of strategies attempted (`1` for [`crate::detect`]).
    pub strategies_attempted: u8,
    /// Number of strategies that failed or were discarded.
    pub strategies_failed: u8,
}

/// The fixed, ordered list of named pipeline stages, exposed for callers
/// that want to label [`DetectionResult::intermediate`] entries.
pub const PROCESSING_PIPELINE: [&str; 6] = [
    "grayscale",
    "blur",
    "edges",
    "threshold",
    "contours",
    "filter",
];

/// The result of a detection run.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Detected document boundaries, most significant first.
    pub boundaries: Vec<Boundary>,
    /// Named intermediate buffers, useful for debugging and visualization.
    pub intermediate: BTreeMap<IntermediateKey, GrayBuffer>,
    /// Diagnostic counters for this run.
    pub stats: DetectionStats,
}

/// Tunable parameters for [`crate::detect`] and [`crate::detect_enhanced`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetectOptions {
    /// Minimum candidate area as a fraction of the raster area.
    pub min_area_ratio: f64,
    /// Maximum candidate area as a fraction of the raster area.
    pub max_area_ratio: f64,
    /// Sobel-magnitude threshold used by the fixed-threshold edge mask.
    pub edge_threshold: u8,
    /// Gaussian blur radius, in pixels, applied before edge detection.
    pub blur_radius: u32,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            min_area_ratio: 0.02,
            max_area_ratio: 0.95,
            edge_threshold: 50,
            blur_radius: 2,
        }
    }
}

impl DetectOptions {
    /// Validate the option ranges, returning [`DetectError::InvalidInput`]
    /// on the first violation. Called before any pixel work begins.
    pub fn validate(&self) -> Result<(), DetectError> {
        if !(0.0..1.0).contains(&self.min_area_ratio) {
            return Err(DetectError::InvalidInput(format!(
                "min_area_ratio must be in [0.0, 1.0), got {}",
                self.min_area_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.max_area_ratio) {
            return Err(DetectError::InvalidInput(format!(
                "max_area_ratio must be in [0.0, 1.0], got {}",
                self.max_area_ratio
            )));
        }
        if self.min_area_ratio > self.max_area_ratio {
            return Err(DetectError::InvalidInput(format!(
                "min_area_ratio ({}) exceeds max_area_ratio ({})",
                self.min_area_ratio, self.max_area_ratio
            )));
        }
        if self.blur_radius < 1 {
            return Err(DetectError::InvalidInput(
                "blur_radius must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur during detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// The input raster or options were invalid.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An intermediate buffer allocation failed.
    #[error("out of memory: {0}")]
    OutOfMemory(String),
}

/// Internal-only error produced when a single strategy attempt in
/// [`crate::detect_enhanced`] cannot proceed. Never surfaced as a
/// [`DetectError`]; the strategy runner logs it and moves on.
#[derive(Debug, thiserror::Error)]
pub(crate) enum StrategyFailed {
    #[error("strategy produced no viable candidates")]
    NoCandidates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn raster_new_rejects_wrong_length() {
        let err = Raster::new(2, 2, vec![0u8; 10]).unwrap_err();
        assert!(matches!(err, DetectError::InvalidInput(_)));
    }

    #[test]
    fn raster_new_rejects_zero_dimensions() {
        let err = Raster::new(0, 0, Vec::new()).unwrap_err();
        assert!(matches!(err, DetectError::InvalidInput(_)));
        let err = Raster::new(0, 5, Vec::new()).unwrap_err();
        assert!(matches!(err, DetectError::InvalidInput(_)));
    }

    #[test]
    fn raster_new_accepts_correct_length() {
        let raster = Raster::new(2, 2, vec![0u8; 16]).unwrap();
        assert_eq!(raster.width(), 2);
        assert_eq!(raster.height(), 2);
    }

    #[test]
    fn gray_buffer_clamped_sampling() {
        let buf = GrayBuffer::from_raw(2, 2, vec![10, 20, 30, 40]);
        assert_eq!(buf.get_clamped(-5, -5), 10);
        assert_eq!(buf.get_clamped(100, 100), 40);
        assert_eq!(buf.get_clamped(1, 0), 20);
    }

    #[test]
    fn detect_options_default_matches_spec() {
        let opts = DetectOptions::default();
        assert!((opts.min_area_ratio - 0.02).abs() < f64::EPSILON);
        assert!((opts.max_area_ratio - 0.95).abs() < f64::EPSILON);
        assert_eq!(opts.edge_threshold, 50);
        assert_eq!(opts.blur_radius, 2);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn detect_options_rejects_inverted_range() {
        let opts = DetectOptions {
            min_area_ratio: 0.9,
            max_area_ratio: 0.1,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn error_invalid_input_display() {
        let err = DetectError::InvalidInput("bad raster".to_string());
        assert_eq!(err.to_string(), "invalid input: bad raster");
    }
}
