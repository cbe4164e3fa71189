//! Per-render configuration.

use heatlens_common::config::{
    HeatShape, HeatmapConfig, HeatmapConfigOverrides, MAX_BLUR_RADIUS,
};
use heatlens_processing_core::grid::HeatGrid;

/// Fill alpha used by the flat modes.
pub const FLAT_FILL_ALPHA: f64 = 0.8;

/// Share of the cell covered by a flat rectangle.
pub const FLAT_RECT_COVERAGE: f64 = 0.9;

/// Options read by the renderer on every draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub shape: HeatShape,
    /// Circle radius for [`HeatShape::FlatCircle`]; `None` derives it from the cell size.
    pub flat_radius: Option<f64>,
    /// Gradient radius for [`HeatShape::GradientBlur`]; `None` derives it from the cell size.
    pub gradient_radius: Option<f64>,
    pub blur_radius: u32,
    pub intensity: f64,
    /// Draw only the N hottest cells.
    pub top_n: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&HeatmapConfig::default())
    }
}

impl RenderOptions {
    pub fn from_config(config: &HeatmapConfig) -> Self {
        Self {
            shape: config.shape,
            flat_radius: config.flat_radius,
            gradient_radius: config.gradient_radius,
            blur_radius: config.blur_radius.min(MAX_BLUR_RADIUS),
            intensity: config.intensity,
            top_n: config.top_n,
        }
    }

    /// Apply the render-related subset of `overrides`.
    pub fn apply_overrides(&mut self, overrides: &HeatmapConfigOverrides) {
        if let Some(shape) = overrides.shape {
            self.shape = shape;
        }
        if overrides.flat_radius.is_some() {
            self.flat_radius = overrides.flat_radius;
        }
        if overrides.gradient_radius.is_some() {
            self.gradient_radius = overrides.gradient_radius;
        }
        if let Some(blur) = overrides.blur_radius {
            self.blur_radius = blur.min(MAX_BLUR_RADIUS);
        }
        if let Some(intensity) = overrides.intensity {
            self.intensity = intensity;
        }
        if overrides.top_n.is_some() {
            self.top_n = overrides.top_n;
        }
    }

    pub fn flat_radius_for(&self, grid: &HeatGrid) -> f64 {
        self.flat_radius
            .unwrap_or_else(|| grid.cell_width().min(grid.cell_height()) / 2.0)
    }

    pub fn gradient_radius_for(&self, grid: &HeatGrid) -> f64 {
        self.gradient_radius
            .unwrap_or_else(|| grid.cell_width().max(grid.cell_height()))
    }

    /// Normalized value scaled by intensity, clamped to `[0, 1]`.
    pub fn scaled(&self, normalized: f64) -> f64 {
        (normalized * self.intensity).clamp(0.0, 1.0)
    }
}
