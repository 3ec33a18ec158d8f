//! Sobel edge magnitude.
//!
//! This is step 3 in the pipeline: estimating the local gradient strength
//! of the blurred grayscale buffer, feeding both the combine stage and the
//! `"edges"` intermediate.

use crate::types::GrayBuffer;

const SOBEL_X: [[f64; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f64; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Compute the Sobel gradient magnitude of `input`.
///
/// The outermost one-pixel border is forced to `0` rather than sampled
/// with clamp-to-edge, matching the border policy used by the rest of the
/// pipeline's edge stage.
#[must_use = "returns the edge magnitude buffer"]
pub fn sobel_magnitude(input: &GrayBuffer) -> GrayBuffer {
    let width = input.width();
    let height = input.height();
    let mut data = vec![0u8; width as usize * height as usize];

    if width < 3 || height < 3 {
        return GrayBuffer::from_raw(width, height, data);
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut gx = 0.0f64;
            let mut gy = 0.0f64;
            for (ny, row_x) in SOBEL_X.iter().enumerate() {
                for (nx, &kx) in row_x.iter().enumerate() {
                    let sample = f64::from(input.get(x + nx as u32 - 1, y + ny as u32 - 1));
                    gx += kx * sample;
                    gy += SOBEL_Y[ny][nx] * sample;
                }
            }
            let magnitude = gx.mul_add(gx, gy * gy).sqrt();
            let idx = y as usize * width as usize + x as usize;
            data[idx] = magnitude.min(255.0) as u8;
        }
    }

    GrayBuffer::from_raw(width, height, data)
}
