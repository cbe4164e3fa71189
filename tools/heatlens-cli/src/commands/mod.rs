pub mod config;
pub mod info;
pub mod record;
pub mod render;
pub mod replay;

use std::path::Path;

use clap::Args;
use heatlens_common::config::{HeatShape, HeatmapConfig, HeatmapConfigOverrides};
use heatlens_processing_core::grid::HeatGrid;
use heatlens_processing_core::pixel::PixelBuffer;
use heatlens_project_model::snapshot::Snapshot;
use heatlens_render_engine::{RenderOptions, Renderer};

/// Render flags shared by the commands that draw.
#[derive(Debug, Clone, Default, Args)]
pub struct RenderArgs {
    /// Heat shape: circle, rect, or gradient
    #[arg(long)]
    pub shape: Option<HeatShape>,

    /// Draw only the N hottest cells
    #[arg(long = "top")]
    pub top_n: Option<usize>,

    /// Box blur radius in pixels (gradient mode)
    #[arg(long)]
    pub blur: Option<u32>,

    /// Intensity multiplier
    #[arg(long)]
    pub intensity: Option<f64>,
}

impl RenderArgs {
    pub fn overrides(&self) -> HeatmapConfigOverrides {
        HeatmapConfigOverrides {
            shape: self.shape,
            top_n: self.top_n,
            blur_radius: self.blur,
            intensity: self.intensity,
            ..Default::default()
        }
    }

    /// Merge the flags over `config` and validate the result.
    pub fn apply(&self, config: &HeatmapConfig) -> anyhow::Result<HeatmapConfig> {
        let merged = config.with_overrides(&self.overrides());
        merged
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid render options: {e}"))?;
        Ok(merged)
    }
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read snapshot {}: {e}", path.display()))?;
    Snapshot::from_json(&json)
        .map_err(|e| anyhow::anyhow!("Failed to parse snapshot {}: {e}", path.display()))
}

pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> anyhow::Result<()> {
    let json = snapshot.to_json_pretty()?;
    std::fs::write(path, json)
        .map_err(|e| anyhow::anyhow!("Failed to write snapshot {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), "Snapshot written");
    Ok(())
}

/// Draw a snapshot onto a fresh buffer covering the whole grid.
pub fn render_snapshot(snapshot: &Snapshot, config: &HeatmapConfig) -> anyhow::Result<PixelBuffer> {
    let grid = HeatGrid::from_snapshot(snapshot)?;
    let (w, h) = grid.pixel_extent();
    let mut buffer = PixelBuffer::new(w.ceil() as u32, h.ceil() as u32);
    let renderer = Renderer::new(RenderOptions::from_config(config));
    let stats = renderer.draw(&grid, &mut buffer)?;
    tracing::debug!(cells_drawn = stats.cells_drawn, shape = %stats.shape, "Rendered snapshot");
    Ok(buffer)
}

pub fn write_png(buffer: &PixelBuffer, path: &Path) -> anyhow::Result<()> {
    image::save_buffer_with_format(
        path,
        buffer.as_bytes(),
        buffer.width(),
        buffer.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| anyhow::anyhow!("Failed to write PNG {}: {e}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "PNG written"
    );
    Ok(())
}

pub fn print_top_cells(snapshot: &Snapshot, n: usize) {
    let top = snapshot.top_cells(n);
    if top.is_empty() {
        println!("  No heat recorded.");
        return;
    }
    for (rank, cell) in top.iter().enumerate() {
        println!(
            "  {:>3}. cell ({}, {}) at ({:.0}, {:.0}): {}",
            rank + 1,
            cell.column,
            cell.row,
            cell.pixel_x,
            cell.pixel_y,
            cell.value
        );
    }
}
