//! Grid dimensions derived from the page layout.

use heatlens_common::config::HeatmapConfig;
use heatlens_common::error::{HeatError, HeatResult};
use heatlens_project_model::event::LayoutUpdate;

/// Grid shape for one viewport/document size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl GridLayout {
    /// Columns always span the viewport; rows cover the document height
    /// in `cell_height` steps, clamped to `[1, max_rows]`.
    pub fn compute(config: &HeatmapConfig, layout: &LayoutUpdate) -> HeatResult<Self> {
        let LayoutUpdate {
            viewport_width,
            document_height,
        } = *layout;

        if !viewport_width.is_finite() || viewport_width <= 0.0 {
            return Err(HeatError::config(format!(
                "viewport width must be positive, got {viewport_width}"
            )));
        }
        if !document_height.is_finite() || document_height <= 0.0 {
            return Err(HeatError::config(format!(
                "document height must be positive, got {document_height}"
            )));
        }
        if config.max_cols == 0 || config.max_rows == 0 {
            return Err(HeatError::config("maxCols and maxRows must be non-zero"));
        }

        let cols = config.max_cols;
        let cell_width = viewport_width / cols as f64;
        let cell_height = config.cell_height;
        let needed = (document_height / cell_height).ceil();
        let rows = if needed >= config.max_rows as f64 {
            config.max_rows
        } else {
            (needed as usize).max(1)
        };

        Ok(Self {
            cols,
            rows,
            cell_width,
            cell_height,
        })
    }

    /// Pixel size of the area the grid covers, rounded up.
    pub fn surface_size(&self) -> (u32, u32) {
        let w = (self.cols as f64 * self.cell_width).ceil();
        let h = (self.rows as f64 * self.cell_height).ceil();
        (w.min(f64::from(u32::MAX)) as u32, h.min(f64::from(u32::MAX)) as u32)
    }
}
