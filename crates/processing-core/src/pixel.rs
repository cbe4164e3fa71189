//! RGBA8 pixel buffers.
//!
//! Buffers hold straight (non-premultiplied) alpha, row-major, four bytes
//! per pixel. Two compositing operators are provided: source-over for
//! visible drawing and saturating additive ("lighter") for accumulation.

use heatlens_common::error::{HeatError, HeatResult};

use crate::color::Rgba;

/// A width x height RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Buffer with every pixel set to `px`.
    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> Self {
        Self {
            width,
            height,
            data: px.repeat(width as usize * height as usize),
        }
    }

    /// Wrap raw RGBA8 bytes; the length must be `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> HeatResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| HeatError::render("pixel buffer size overflow"))?;
        if data.len() != expected {
            return Err(HeatError::render(format!(
                "pixel buffer expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Overwrite one pixel. Returns `false` when out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) -> bool {
        let Some(i) = self.offset(x, y) else {
            return false;
        };
        self.data[i..i + 4].copy_from_slice(&px);
        true
    }

    /// Make every pixel fully transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Whether every pixel has zero alpha.
    pub fn is_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Source-over blend of a straight-alpha color.
    pub fn blend_over(&mut self, x: u32, y: u32, src: Rgba) {
        let Some(i) = self.offset(x, y) else {
            return;
        };
        let sa = f64::from(src.a.clamp(0.0, 1.0));
        if sa <= 0.0 {
            return;
        }
        let da = f64::from(self.data[i + 3]) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            self.data[i..i + 4].fill(0);
            return;
        }
        let src_rgb = [src.r, src.g, src.b];
        for (c, sc) in src_rgb.iter().enumerate() {
            let dc = f64::from(self.data[i + c]);
            let blended = (f64::from(*sc) * sa + dc * da * (1.0 - sa)) / out_a;
            self.data[i + c] = to_u8(blended);
        }
        self.data[i + 3] = to_u8(out_a * 255.0);
    }

    /// Additive ("lighter") compositing: premultiplied source is summed
    /// into the destination, saturating at 255 per channel.
    pub fn add_lighter(&mut self, x: u32, y: u32, src: Rgba) {
        let Some(i) = self.offset(x, y) else {
            return;
        };
        let sa = f64::from(src.a.clamp(0.0, 1.0));
        if sa <= 0.0 {
            return;
        }
        let src_rgb = [src.r, src.g, src.b];
        for (c, sc) in src_rgb.iter().enumerate() {
            let add = to_u8(f64::from(*sc) * sa);
            self.data[i + c] = self.data[i + c].saturating_add(add);
        }
        self.data[i + 3] = self.data[i + 3].saturating_add(to_u8(sa * 255.0));
    }

    /// Source-over composite of a same-sized buffer onto this one.
    pub fn composite_over(&mut self, src: &PixelBuffer) -> HeatResult<()> {
        if src.width != self.width || src.height != self.height {
            return Err(HeatError::render(format!(
                "composite expects equal sizes, got {}x{} onto {}x{}",
                src.width, src.height, self.width, self.height
            )));
        }
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(px) = src.pixel(x, y) {
                    if px[3] != 0 {
                        self.blend_over(x, y, Rgba::from_rgba8(px));
                    }
                }
            }
        }
        Ok(())
    }
}

fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_validates_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut buf = PixelBuffer::new(3, 2);
        assert!(buf.set_pixel(2, 1, [1, 2, 3, 4]));
        assert!(!buf.set_pixel(3, 0, [9, 9, 9, 9]));
        assert_eq!(buf.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(buf.pixel(0, 2), None);
        buf.clear();
        assert!(buf.is_transparent());
    }

    #[test]
    fn test_blend_over_opaque_replaces() {
        let mut buf = PixelBuffer::filled(1, 1, [0, 0, 255, 255]);
        buf.blend_over(0, 0, Rgba::new(255, 0, 0, 1.0));
        assert_eq!(buf.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_blend_over_transparent_destination_keeps_color() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.blend_over(0, 0, Rgba::new(10, 20, 30, 0.5));
        assert_eq!(buf.pixel(0, 0), Some([10, 20, 30, 128]));
    }

    #[test]
    fn test_blend_over_half_alpha_mixes() {
        let mut buf = PixelBuffer::filled(1, 1, [0, 0, 0, 255]);
        buf.blend_over(0, 0, Rgba::new(200, 100, 50, 0.5));
        assert_eq!(buf.pixel(0, 0), Some([100, 50, 25, 255]));
    }

    #[test]
    fn test_add_lighter_accumulates_and_saturates() {
        let mut buf = PixelBuffer::new(1, 1);
        let src = Rgba::new(255, 0, 0, 0.4);
        buf.add_lighter(0, 0, src);
        assert_eq!(buf.pixel(0, 0), Some([102, 0, 0, 102]));
        buf.add_lighter(0, 0, src);
        assert_eq!(buf.pixel(0, 0), Some([204, 0, 0, 204]));
        buf.add_lighter(0, 0, src);
        assert_eq!(buf.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_composite_over_requires_equal_size() {
        let mut dst = PixelBuffer::new(2, 2);
        let src = PixelBuffer::new(1, 2);
        assert!(dst.composite_over(&src).is_err());

        let src = PixelBuffer::filled(2, 2, [9, 8, 7, 255]);
        dst.composite_over(&src).unwrap();
        assert_eq!(dst.pixel(1, 1), Some([9, 8, 7, 255]));
    }
}
