//! Grayscale conversion.
//!
//! This is step 1 in the pipeline, turning the decoded RGBA raster into a
//! single-channel [`GrayBuffer`] for every later stage to operate on.

use crate::types::{GrayBuffer, Raster};

/// Convert a raster to grayscale using ITU-R BT.601 luma weights.
///
/// `gray = 0.299*r + 0.587*g + 0.114*b`, rounded to the nearest `u8`. The
/// alpha channel is ignored.
#[must_use = "returns the grayscale buffer"]
pub fn to_grayscale(raster: &Raster) -> GrayBuffer {
    let width = raster.width();
    let height = raster.height();
    let mut data = Vec::with_capacity(width as usize * height as usize);

    for y in 0..height {
        for x in 0..width {
            let [r, g, b, _a] = raster.get(x, y);
            let luma = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
            data.push(luma.round().clamp(0.0, 255.0) as u8);
        }
    }

    GrayBuffer::from_raw(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, r: u8, g: u8, b: u8) -> Raster {
        let mut pixels = Vec::with_capacity(4 * width as usize * height as usize);
        for _ in 0..(width * height) {
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
        Raster::new(width, height, pixels).unwrap()
    }

    #[test]
    fn white_converts_to_white() {
        let raster = solid(2, 2, 255, 255, 255);
        let gray = to_grayscale(&raster);
        assert!(gray.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn black_converts_to_black() {
        let raster = solid(2, 2, 0, 0, 0);
        let gray = to_grayscale(&raster);
        assert!(gray.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn pure_green_uses_luma_weight() {
        let raster = solid(1, 1, 0, 255, 0);
        let gray = to_grayscale(&raster);
        // 0.587 * 255 = 149.685, rounds to 150.
        assert_eq!(gray.get(0, 0), 150);
    }

    #[test]
    fn preserves_dimensions() {
        let raster = solid(5, 3, 128, 64, 32);
        let gray = to_grayscale(&raster);
        assert_eq!(gray.width(), 5);
        assert_eq!(gray.height(), 3);
    }
}
