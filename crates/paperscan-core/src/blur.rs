//! Gaussian blur.
//!
//! This is step 2 in the pipeline, smoothing the grayscale buffer before
//! edge detection to suppress sensor noise and fine texture.

use crate::types::GrayBuffer;

/// Apply a Gaussian blur of integer radius `r` (kernel size `2r+1`).
///
/// Kernel weights are `exp(-(dx^2+dy^2) / (2*sigma^2))` with `sigma = r/2`,
/// normalized by the sum of the weights actually sampled (clamp-to-edge, so
/// every pixel sees the full unclamped kernel weight). All accumulation is
/// done in `f64`; the result is rounded to the nearest `u8` at the end.
///
/// # Panics
///
/// Never panics; `radius` of `0` degenerates to a single-tap (no-op) kernel.
#[must_use = "returns the blurred buffer"]
pub fn gaussian_blur(input: &GrayBuffer, radius: u32) -> GrayBuffer {
    let kernel = build_kernel(radius);
    let width = input.width();
    let height = input.height();
    let mut data = Vec::with_capacity(width as usize * height as usize);

    let r = radius as i64;
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut acc = 0.0f64;
            for (ky, row) in kernel.iter().enumerate() {
                let dy = ky as i64 - r;
                for (kx, &weight) in row.iter().enumerate() {
                    let dx = kx as i64 - r;
                    let sample = f64::from(input.get_clamped(x + dx, y + dy));
                    acc += weight * sample;
                }
            }
            data.push(acc.round().clamp(0.0, 255.0) as u8);
        }
    }

    GrayBuffer::from_raw(width, height, data)
}

/// Build a normalized `(2r+1) x (2r+1)` Gaussian kernel with `sigma = r/2`.
fn build_kernel(radius: u32) -> Vec<Vec<f64>> {
    let r = radius as i64;
    let sigma = (radius as f64 / 2.0).max(f64::MIN_POSITIVE);
    let two_sigma_sq = 2.0 * sigma * sigma;

    let size = (2 * radius + 1) as usize;
    let mut kernel = vec![vec![0.0f64; size]; size];
    let mut sum = 0.0f64;

    for (ky, row) in kernel.iter_mut().enumerate() {
        let dy = ky as i64 - r;
        for (kx, weight) in row.iter_mut().enumerate() {
            let dx = kx as i64 - r;
            #[allow(clippy::cast_precision_loss)]
            let value = (-((dx * dx + dy * dy) as f64) / two_sigma_sq).exp();
            *weight = value;
            sum += value;
        }
    }

    if sum > 0.0 {
        for row in &mut kernel {
            for weight in row {
                *weight /= sum;
            }
        }
    }

    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_buffer_unchanged() {
        let input = GrayBuffer::from_raw(5, 5, vec![100u8; 25]);
        let blurred = gaussian_blur(&input, 2);
        assert!(blurred.data().iter().all(|&v| v == 100));
    }

    #[test]
    fn preserves_dimensions() {
        let input = GrayBuffer::from_raw(7, 4, vec![0u8; 28]);
        let blurred = gaussian_blur(&input, 1);
        assert_eq!(blurred.width(), 7);
        assert_eq!(blurred.height(), 4);
    }

    #[test]
    fn smooths_an_impulse() {
        let mut data = vec![0u8; 9 * 9];
        data[4 * 9 + 4] = 255;
        let input = GrayBuffer::from_raw(9, 9, data);
        let blurred = gaussian_blur(&input, 2);
        // The center should drop well below 255 once its weight is spread
        // across the kernel footprint, but still be the local maximum.
        assert!(blurred.get(4, 4) < 255);
        assert!(blurred.get(4, 4) >= blurred.get(0, 0));
    }

    #[test]
    fn kernel_is_normalized() {
        let kernel = build_kernel(2);
        let sum: f64 = kernel.iter().flatten().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn kernel_is_symmetric() {
        let kernel = build_kernel(2);
        let size = kernel.len();
        for ky in 0..size {
            for kx in 0..size {
                assert!((kernel[ky][kx] - kernel[size - 1 - ky][size - 1 - kx]).abs() < 1e-12);
            }
        }
    }
}
