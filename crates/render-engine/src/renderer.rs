//! Heatmap renderer.

use heatlens_common::config::{HeatShape, HeatmapConfigOverrides};
use heatlens_common::error::HeatResult;
use heatlens_processing_core::color::ColorRamp;
use heatlens_processing_core::grid::HeatGrid;
use heatlens_processing_core::pixel::PixelBuffer;

use crate::compositor::{fill_circle, fill_rect};
use crate::options::{RenderOptions, FLAT_FILL_ALPHA, FLAT_RECT_COVERAGE};
use crate::pipeline::GradientPipeline;
use crate::surface::Surface;

/// Summary of one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub shape: HeatShape,
    /// Non-zero cells drawn.
    pub cells_drawn: usize,
}

/// Draws a grid onto a surface. Holds configuration only.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
    ramp: ColorRamp,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self::with_ramp(options, ColorRamp::default())
    }

    pub fn with_ramp(options: RenderOptions, ramp: ColorRamp) -> Self {
        Self { options, ramp }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Partially update options between draws.
    pub fn apply_overrides(&mut self, overrides: &HeatmapConfigOverrides) {
        self.options.apply_overrides(overrides);
    }

    /// Clear the surface and draw every non-zero cell.
    pub fn render<S: Surface + ?Sized>(
        &self,
        grid: &HeatGrid,
        surface: &mut S,
    ) -> HeatResult<RenderStats> {
        let target = surface.acquire()?;
        target.clear();

        let cells_drawn = match self.options.shape {
            HeatShape::FlatCircle => self.draw_flat(grid, target, true),
            HeatShape::FlatRect => self.draw_flat(grid, target, false),
            HeatShape::GradientBlur => self.draw_gradient(grid, target)?,
        };

        tracing::trace!(shape = %self.options.shape, cells_drawn, "Rendered heatmap");
        Ok(RenderStats {
            shape: self.options.shape,
            cells_drawn,
        })
    }

    /// Draw only the N hottest cells. The grid itself is not modified.
    pub fn render_top_cells<S: Surface + ?Sized>(
        &self,
        grid: &HeatGrid,
        n: usize,
        surface: &mut S,
    ) -> HeatResult<RenderStats> {
        let filtered = grid.top_cells_grid(n);
        self.render(&filtered, surface)
    }

    /// Render honoring the configured top-N filter, if any.
    pub fn draw<S: Surface + ?Sized>(
        &self,
        grid: &HeatGrid,
        surface: &mut S,
    ) -> HeatResult<RenderStats> {
        match self.options.top_n {
            Some(n) => self.render_top_cells(grid, n, surface),
            None => self.render(grid, surface),
        }
    }

    fn draw_flat(&self, grid: &HeatGrid, target: &mut PixelBuffer, round: bool) -> usize {
        let (cw, ch) = (grid.cell_width(), grid.cell_height());
        let radius = self.options.flat_radius_for(grid);
        let mut drawn = 0;

        for (index, _) in grid.non_zero() {
            let level = self.options.scaled(grid.normalized(index));
            if level <= 0.0 {
                continue;
            }
            let Some(cell) = grid.heat_cell(index) else {
                continue;
            };
            let color = self.ramp.color_for(level, FLAT_FILL_ALPHA);
            let (cx, cy) = cell.center(cw, ch);

            if round {
                fill_circle(target, cx, cy, radius, color);
            } else {
                let w = cw * FLAT_RECT_COVERAGE;
                let h = ch * FLAT_RECT_COVERAGE;
                fill_rect(target, cx - w / 2.0, cy - h / 2.0, w, h, color);
            }
            drawn += 1;
        }
        drawn
    }

    fn draw_gradient(&self, grid: &HeatGrid, target: &mut PixelBuffer) -> HeatResult<usize> {
        let pipeline = GradientPipeline::new(
            &self.ramp,
            self.options.gradient_radius_for(grid),
            self.options.blur_radius,
            self.options.intensity,
        );
        let (layer, cells) = pipeline.run(grid, target.width(), target.height());
        target.composite_over(&layer)?;
        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatlens_common::error::HeatError;

    fn hot_grid() -> HeatGrid {
        let mut grid = HeatGrid::new(10, 10, 20.0, 20.0).unwrap();
        for _ in 0..4 {
            grid.add_heat(25.0, 25.0);
        }
        grid.add_heat(105.0, 105.0);
        grid
    }

    fn renderer(shape: HeatShape) -> Renderer {
        Renderer::new(RenderOptions {
            shape,
            ..RenderOptions::default()
        })
    }

    struct LostSurface;

    impl Surface for LostSurface {
        fn acquire(&mut self) -> HeatResult<&mut PixelBuffer> {
            Err(HeatError::surface_unavailable("context lost"))
        }
    }

    #[test]
    fn test_flat_rect_fills_cell_center() {
        let mut surface = PixelBuffer::new(200, 200);
        let stats = renderer(HeatShape::FlatRect)
            .render(&hot_grid(), &mut surface)
            .unwrap();
        assert_eq!(stats.cells_drawn, 2);

        // Hottest cell is red at alpha 0.8.
        assert_eq!(surface.pixel(30, 30), Some([255, 0, 0, 204]));
        // The 10% margin at the cell edge stays clear.
        assert_eq!(surface.pixel(20, 20), Some([0, 0, 0, 0]));
        // Untouched cell.
        assert_eq!(surface.pixel(190, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_flat_circle_uses_derived_radius() {
        let mut surface = PixelBuffer::new(200, 200);
        renderer(HeatShape::FlatCircle)
            .render(&hot_grid(), &mut surface)
            .unwrap();
        assert_ne!(surface.pixel(30, 30).unwrap()[3], 0);
        // Radius 10 around (30, 30) misses the cell corner.
        assert_eq!(surface.pixel(21, 21), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_gradient_mode_draws_soft_overlay() {
        let mut surface = PixelBuffer::new(200, 200);
        let stats = renderer(HeatShape::GradientBlur)
            .render(&hot_grid(), &mut surface)
            .unwrap();
        assert_eq!(stats.shape, HeatShape::GradientBlur);
        assert_eq!(stats.cells_drawn, 2);
        assert_ne!(surface.pixel(30, 30).unwrap()[3], 0);
        // Soft falloff reaches past the cell boundary.
        assert_ne!(surface.pixel(41, 30).unwrap()[3], 0);
        assert_eq!(surface.pixel(180, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_render_clears_previous_frame() {
        let mut surface = PixelBuffer::filled(200, 200, [1, 2, 3, 255]);
        let empty = HeatGrid::new(10, 10, 20.0, 20.0).unwrap();
        let stats = renderer(HeatShape::FlatRect)
            .render(&empty, &mut surface)
            .unwrap();
        assert_eq!(stats.cells_drawn, 0);
        assert!(surface.is_transparent());
    }

    #[test]
    fn test_render_top_cells_drops_noise_without_mutating_grid() {
        let grid = hot_grid();
        let mut surface = PixelBuffer::new(200, 200);
        let stats = renderer(HeatShape::FlatRect)
            .render_top_cells(&grid, 1, &mut surface)
            .unwrap();
        assert_eq!(stats.cells_drawn, 1);
        assert_eq!(surface.pixel(110, 110), Some([0, 0, 0, 0]));
        assert_eq!(grid.total_interactions(), 5.0);
    }

    #[test]
    fn test_draw_honors_configured_top_n() {
        let grid = hot_grid();
        let mut surface = PixelBuffer::new(200, 200);
        let renderer = Renderer::new(RenderOptions {
            shape: HeatShape::FlatRect,
            top_n: Some(1),
            ..RenderOptions::default()
        });
        assert_eq!(renderer.draw(&grid, &mut surface).unwrap().cells_drawn, 1);
    }

    #[test]
    fn test_unavailable_surface_fails_the_call() {
        let err = renderer(HeatShape::GradientBlur)
            .render(&hot_grid(), &mut LostSurface)
            .unwrap_err();
        assert!(matches!(err, HeatError::SurfaceUnavailable { .. }));
    }

    #[test]
    fn test_apply_overrides_switches_mode() {
        let mut renderer = renderer(HeatShape::GradientBlur);
        renderer.apply_overrides(&HeatmapConfigOverrides {
            shape: Some(HeatShape::FlatCircle),
            ..Default::default()
        });
        assert_eq!(renderer.options().shape, HeatShape::FlatCircle);
    }
}
