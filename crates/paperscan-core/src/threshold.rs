//! Adaptive mean threshold and mask combination.
//!
//! This is step 4 in the pipeline: binarizing the blurred grayscale buffer
//! against its local neighborhood mean, then OR-combining that mask with
//! the thresholded Sobel edge magnitude to form the mask contour tracing
//! operates on.

use crate::types::{GrayBuffer, Mask};

/// Binarize `input` using an adaptive mean threshold.
///
/// For each pixel at `(x, y)`, compute the mean `m` of the in-bounds
/// samples in the `block_size x block_size` window centered on it (the
/// divisor is the number of in-bounds samples actually summed, not
/// `block_size^2`). Output is `255` if the pixel is darker than `m - c`,
/// else `0`.
#[must_use = "returns the thresholded mask"]
pub fn adaptive_mean_threshold(input: &GrayBuffer, block_size: u32, c: i32) -> Mask {
    let width = input.width();
    let height = input.height();
    let radius = (block_size / 2) as i64;
    let mut data = vec![0u8; width as usize * height as usize];

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut sum = 0.0f64;
            let mut count = 0u32;
            for dy in -radius..=radius {
                let sy = y + dy;
                if sy < 0 || sy >= height as i64 {
                    continue;
                }
                for dx in -radius..=radius {
                    let sx = x + dx;
                    if sx < 0 || sx >= width as i64 {
                        continue;
                    }
                    sum += f64::from(input.get(sx as u32, sy as u32));
                    count += 1;
                }
            }
            let mean = sum / f64::from(count);
            let value = f64::from(input.get(x as u32, y as u32));
            let idx = y as usize * width as usize + x as usize;
            if value < mean - f64::from(c) {
                data[idx] = 255;
            }
        }
    }

    Mask::from_binary(GrayBuffer::from_raw(width, height, data))
}

/// Combine the Sobel edge magnitude and adaptive threshold masks with a
/// logical OR: `output = 255` if `edges > edge_threshold OR threshold >
/// 128`, else `0`.
///
/// # Panics
///
/// Panics if `edges` and `threshold` have different dimensions.
#[must_use = "returns the combined mask"]
pub fn combine(edges: &GrayBuffer, threshold: &Mask, edge_threshold: u8) -> Mask {
    assert_eq!(edges.width(), threshold.width());
    assert_eq!(edges.height(), threshold.height());

    let width = edges.width();
    let height = edges.height();
    let mut data = vec![0u8; width as usize * height as usize];

    for y in 0..height {
        for x in 0..width {
            let edge_val = edges.get(x, y);
            let thresh_val = threshold.as_gray().get(x, y);
            if edge_val > edge_threshold || thresh_val > 128 {
                data[y as usize * width as usize + x as usize] = 255;
            }
        }
    }

    Mask::from_binary(GrayBuffer::from_raw(width, height, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_buffer_has_no_foreground() {
        let input = GrayBuffer::from_raw(10, 10, vec![128u8; 100]);
        let mask = adaptive_mean_threshold(&input, 15, 5);
        assert!((0..10).all(|y| (0..10).all(|x| !mask.is_set(x, y))));
    }

    #[test]
    fn dark_spot_on_bright_field_is_set() {
        let mut data = vec![200u8; 21 * 21];
        data[10 * 21 + 10] = 0;
        let input = GrayBuffer::from_raw(21, 21, data);
        let mask = adaptive_mean_threshold(&input, 15, 5);
        assert!(mask.is_set(10, 10));
    }

    #[test]
    fn combine_is_or_of_inputs() {
        let edges = GrayBuffer::from_raw(2, 1, vec![0, 200]);
        let threshold = Mask::from_binary(GrayBuffer::from_raw(2, 1, vec![255, 0]));
        let combined = combine(&edges, &threshold, 50);
        assert!(combined.is_set(0, 0));
        assert!(combined.is_set(1, 0));
    }

    #[test]
    fn combine_false_when_both_below_thresholds() {
        let edges = GrayBuffer::from_raw(1, 1, vec![10]);
        let threshold = Mask::from_binary(GrayBuffer::from_raw(1, 1, vec![0]));
        let combined = combine(&edges, &threshold, 50);
        assert!(!combined.is_set(0, 0));
    }
}
