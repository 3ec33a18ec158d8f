//! Morphological dilate and erode.
//!
//! This is step 5 in the pipeline: closing small gaps in the combined mask
//! (`dilate(r=2) ∘ erode(r=1)`) so the contour tracer sees a single
//! unbroken outer boundary per document.

use crate::types::{GrayBuffer, Mask};

/// Dilate `input` with a square structuring element of radius `r`: the
/// output pixel is the max over the `(2r+1)^2` clamp-to-edge neighborhood.
#[must_use = "returns the dilated mask"]
pub fn dilate(input: &Mask, r: u32) -> Mask {
    Mask::from_binary(extremum(input.as_gray(), r, u8::max, 0))
}

/// Erode `input` with a square structuring element of radius `r`: the
/// output pixel is the min over the `(2r+1)^2` clamp-to-edge neighborhood.
#[must_use = "returns the eroded mask"]
pub fn erode(input: &Mask, r: u32) -> Mask {
    Mask::from_binary(extremum(input.as_gray(), r, u8::min, 255))
}

/// Apply `dilate(r=2)` followed by `erode(r=1)` — a morphological
/// close-like operation that fills small gaps without eroding corners away.
#[must_use = "returns the processed mask"]
pub fn close(input: &Mask) -> Mask {
    erode(&dilate(input, 2), 1)
}

fn extremum(input: &GrayBuffer, r: u32, combine: fn(u8, u8) -> u8, identity: u8) -> GrayBuffer {
    let width = input.width();
    let height = input.height();
    let ri = r as i64;
    let mut data = Vec::with_capacity(width as usize * height as usize);

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut acc = identity;
            for dy in -ri..=ri {
                for dx in -ri..=ri {
                    acc = combine(acc, input.get_clamped(x + dx, y + dy));
                }
            }
            data.push(acc);
        }
    }

    GrayBuffer::from_raw(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(width: u32, height: u32, data: Vec<u8>) -> Mask {
        Mask::from_binary(GrayBuffer::from_raw(width, height, data))
    }

    #[test]
    fn dilate_grows_foreground() {
        let mut data = vec![0u8; 25];
        data[2 * 5 + 2] = 255;
        let mask = mask_from(5, 5, data);
        let dilated = dilate(&mask, 1);
        assert!(dilated.is_set(1, 2));
        assert!(dilated.is_set(3, 2));
        assert!(dilated.is_set(2, 1));
        assert!(dilated.is_set(2, 3));
    }

    #[test]
    fn erode_shrinks_foreground() {
        let data = vec![255u8; 25];
        let mask = mask_from(5, 5, data);
        let eroded = erode(&mask, 1);
        // Clamp-to-edge means a uniform foreground stays fully set.
        assert!(eroded.as_gray().data().iter().all(|&v| v == 255));
    }

    #[test]
    fn erode_removes_isolated_pixel() {
        let mut data = vec![0u8; 25];
        data[2 * 5 + 2] = 255;
        let mask = mask_from(5, 5, data);
        let eroded = erode(&mask, 1);
        assert!(!eroded.is_set(2, 2));
    }

    #[test]
    fn close_fills_small_gap() {
        // A horizontal bar with a 1-pixel gap in the middle.
        let width = 11u32;
        let height = 3u32;
        let mut data = vec![0u8; (width * height) as usize];
        for x in 1..10u32 {
            if x == 5 {
                continue;
            }
            data[(width + x) as usize] = 255;
        }
        let mask = mask_from(width, height, data);
        let closed = close(&mask);
        assert!(closed.is_set(5, 1));
    }
}
