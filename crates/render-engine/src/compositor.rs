//! Raster primitives: shape fills and gradient accumulation.
//!
//! A pixel is covered when its center `(x + 0.5, y + 0.5)` lies inside the
//! shape. Everything is clipped to the target buffer.

use heatlens_processing_core::color::{RadialGradient, Rgba};
use heatlens_processing_core::pixel::PixelBuffer;

/// Inclusive-exclusive pixel span `[lo, hi)` clipped to `[0, limit)`.
fn clip_span(lo: f64, hi: f64, limit: u32) -> Option<(u32, u32)> {
    let lo = lo.floor().max(0.0);
    let hi = hi.ceil().min(f64::from(limit));
    if lo.is_nan() || hi.is_nan() || lo >= hi {
        return None;
    }
    Some((lo as u32, hi as u32))
}

/// Source-over fill of a circle.
pub fn fill_circle(buf: &mut PixelBuffer, cx: f64, cy: f64, radius: f64, color: Rgba) -> usize {
    if color.is_transparent() || radius.is_nan() || radius <= 0.0 {
        return 0;
    }
    let Some((x0, x1)) = clip_span(cx - radius, cx + radius, buf.width()) else {
        return 0;
    };
    let Some((y0, y1)) = clip_span(cy - radius, cy + radius, buf.height()) else {
        return 0;
    };

    let r2 = radius * radius;
    let mut touched = 0;
    for y in y0..y1 {
        let dy = f64::from(y) + 0.5 - cy;
        for x in x0..x1 {
            let dx = f64::from(x) + 0.5 - cx;
            if dx * dx + dy * dy <= r2 {
                buf.blend_over(x, y, color);
                touched += 1;
            }
        }
    }
    touched
}

/// Source-over fill of an axis-aligned rectangle.
pub fn fill_rect(
    buf: &mut PixelBuffer,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    color: Rgba,
) -> usize {
    if color.is_transparent() || width.is_nan() || height.is_nan() || width <= 0.0 || height <= 0.0
    {
        return 0;
    }
    let right = left + width;
    let bottom = top + height;
    let Some((x0, x1)) = clip_span(left, right, buf.width()) else {
        return 0;
    };
    let Some((y0, y1)) = clip_span(top, bottom, buf.height()) else {
        return 0;
    };

    let mut touched = 0;
    for y in y0..y1 {
        let py = f64::from(y) + 0.5;
        if py < top || py >= bottom {
            continue;
        }
        for x in x0..x1 {
            let px = f64::from(x) + 0.5;
            if px >= left && px < right {
                buf.blend_over(x, y, color);
                touched += 1;
            }
        }
    }
    touched
}

/// Additively composite a radial gradient, so overlapping hotspots sum.
pub fn add_radial_gradient(buf: &mut PixelBuffer, gradient: &RadialGradient) -> usize {
    let r = gradient.radius;
    let (cx, cy) = gradient.center;
    let Some((x0, x1)) = clip_span(cx - r, cx + r, buf.width()) else {
        return 0;
    };
    let Some((y0, y1)) = clip_span(cy - r, cy + r, buf.height()) else {
        return 0;
    };

    let mut touched = 0;
    for y in y0..y1 {
        for x in x0..x1 {
            let color = gradient.sample(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if !color.is_transparent() {
                buf.add_lighter(x, y, color);
                touched += 1;
            }
        }
    }
    touched
}
