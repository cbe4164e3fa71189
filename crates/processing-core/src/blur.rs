//! Separable box blur.
//!
//! Each pass replaces every channel (alpha included) with the rounded
//! unweighted mean of `2 * radius + 1` samples along one axis. Samples
//! past an edge reuse the nearest in-bounds pixel, so a flat field stays
//! flat all the way to the border.

use crate::pixel::PixelBuffer;

/// Horizontal pass then vertical pass. Radius 0 returns a copy.
pub fn box_blur(src: &PixelBuffer, radius: u32) -> PixelBuffer {
    if radius == 0 || src.width() == 0 || src.height() == 0 {
        return src.clone();
    }

    let width = src.width();
    let height = src.height();
    let mut tmp = vec![0u8; src.as_bytes().len()];
    let mut out = vec![0u8; src.as_bytes().len()];

    horizontal_pass(src.as_bytes(), &mut tmp, width, height, radius);
    vertical_pass(&tmp, &mut out, width, height, radius);

    PixelBuffer::from_raw(width, height, out).unwrap_or_else(|_| src.clone())
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, radius: u32) {
    let r = radius as i64;
    let w = i64::from(width);
    let taps = (2 * r + 1) as u64;
    for y in 0..i64::from(height) {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for dx in -r..=r {
                let sx = (x + dx).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = mean_u8(acc[c], taps);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, radius: u32) {
    let r = radius as i64;
    let w = i64::from(width);
    let h = i64::from(height);
    let taps = (2 * r + 1) as u64;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for dy in -r..=r {
                let sy = (y + dy).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = mean_u8(acc[c], taps);
            }
        }
    }
}

fn mean_u8(sum: u64, taps: u64) -> u8 {
    ((sum + taps / 2) / taps).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_zero_returns_copy() {
        let src = PixelBuffer::from_raw(1, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(box_blur(&src, 0), src);
    }

    #[test]
    fn test_flat_field_stays_flat() {
        let src = PixelBuffer::filled(7, 5, [10, 20, 30, 40]);
        for radius in [1, 2, 3, 10, 50] {
            assert_eq!(box_blur(&src, radius), src);
        }
    }

    #[test]
    fn test_edges_reuse_nearest_pixel() {
        // Row of three pixels: 0, 0, 90 (red only). Radius 1.
        let mut src = PixelBuffer::new(3, 1);
        src.set_pixel(2, 0, [90, 0, 0, 0]);
        let out = box_blur(&src, 1);
        // x=0: samples [0,0,0] -> 0; x=1: [0,0,90] -> 30; x=2: [0,90,90] -> 60.
        assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(out.pixel(1, 0), Some([30, 0, 0, 0]));
        assert_eq!(out.pixel(2, 0), Some([60, 0, 0, 0]));
    }

    #[test]
    fn test_alpha_is_averaged() {
        let mut src = PixelBuffer::new(3, 3);
        src.set_pixel(1, 1, [0, 0, 0, 255]);
        let out = box_blur(&src, 1);
        // 255 / 3 horizontally, then / 3 vertically.
        assert_eq!(out.pixel(1, 1), Some([0, 0, 0, 28]));
        assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 28]));
    }

    #[test]
    fn test_single_pixel_covers_kernel_footprint() {
        let mut src = PixelBuffer::new(9, 9);
        src.set_pixel(4, 4, [255, 255, 255, 255]);
        let out = box_blur(&src, 2);

        let nonzero = out.as_bytes().chunks_exact(4).filter(|px| px[3] != 0).count();
        assert_eq!(nonzero, 25);
    }

    #[test]
    fn test_radius_far_beyond_buffer_does_not_overflow() {
        let src = PixelBuffer::filled(1, 1, [255; 4]);
        assert_eq!(box_blur(&src, 9_000_000), src);
    }
}
