//! Render a saved snapshot to PNG.

use std::path::PathBuf;

use heatlens_common::config::HeatmapConfig;

use super::{load_snapshot, render_snapshot, write_png};

pub fn run(snapshot_path: PathBuf, png: PathBuf, config: HeatmapConfig) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&snapshot_path)?;
    println!(
        "Rendering {} ({} mode)",
        snapshot_path.display(),
        config.shape
    );

    let buffer = render_snapshot(&snapshot, &config)?;
    write_png(&buffer, &png)?;
    println!("Heatmap saved to: {}", png.display());
    Ok(())
}
