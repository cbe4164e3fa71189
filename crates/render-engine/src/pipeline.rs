//! Three-stage gradient pipeline: accumulate, blur, colorize.
//!
//! Each stage takes and returns an explicit [`PixelBuffer`]. No stage
//! reads hidden compositing state; the additive operator and the blur
//! radius are properties of the stage itself.

use heatlens_processing_core::blur::box_blur;
use heatlens_processing_core::color::ColorRamp;
use heatlens_processing_core::grid::HeatGrid;
use heatlens_processing_core::pixel::PixelBuffer;

use crate::compositor::add_radial_gradient;

/// Gradient-mode renderer for one draw.
#[derive(Debug, Clone, Copy)]
pub struct GradientPipeline<'a> {
    ramp: &'a ColorRamp,
    radius: f64,
    blur_radius: u32,
    intensity: f64,
}

impl<'a> GradientPipeline<'a> {
    pub fn new(ramp: &'a ColorRamp, radius: f64, blur_radius: u32, intensity: f64) -> Self {
        Self {
            ramp,
            radius,
            blur_radius,
            intensity,
        }
    }

    /// Stage 1: sum one radial gradient per non-zero cell into a fresh buffer.
    ///
    /// Returns the buffer and the number of cells drawn.
    pub fn accumulate(&self, grid: &HeatGrid, width: u32, height: u32) -> (PixelBuffer, usize) {
        let mut buffer = PixelBuffer::new(width, height);
        let mut cells = 0;
        for (index, _) in grid.non_zero() {
            let normalized = grid.normalized(index);
            if normalized <= 0.0 {
                continue;
            }
            let Some(cell) = grid.heat_cell(index) else {
                continue;
            };
            let center = cell.center(grid.cell_width(), grid.cell_height());
            let gradient = self.ramp.radial_gradient(center, self.radius, normalized);
            add_radial_gradient(&mut buffer, &gradient);
            cells += 1;
        }
        (buffer, cells)
    }

    /// Stage 2: separable box blur.
    pub fn blur(&self, accumulated: &PixelBuffer) -> PixelBuffer {
        box_blur(accumulated, self.blur_radius)
    }

    /// Stage 3: map accumulated alpha (scaled by intensity) through the ramp.
    ///
    /// The level also scales the output alpha so sparse edges fade out
    /// instead of ending in a hard rim.
    pub fn colorize(&self, blurred: &PixelBuffer) -> PixelBuffer {
        let mut out = PixelBuffer::new(blurred.width(), blurred.height());
        for y in 0..blurred.height() {
            for x in 0..blurred.width() {
                let Some(px) = blurred.pixel(x, y) else {
                    continue;
                };
                if px[3] == 0 {
                    continue;
                }
                let level = (f64::from(px[3]) / 255.0 * self.intensity).clamp(0.0, 1.0);
                let color = self.ramp.color_for(level, level);
                out.set_pixel(x, y, color.to_rgba8());
            }
        }
        out
    }

    /// Run all three stages at the given output size.
    pub fn run(&self, grid: &HeatGrid, width: u32, height: u32) -> (PixelBuffer, usize) {
        let (accumulated, cells) = self.accumulate(grid, width, height);
        let blurred = self.blur(&accumulated);
        (self.colorize(&blurred), cells)
    }
}
