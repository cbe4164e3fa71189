//! Replay a recorded stream through a heatmap session.

use std::path::PathBuf;

use heatlens_common::config::HeatmapConfig;
use heatlens_processing_core::pixel::PixelBuffer;
use heatlens_project_model::event::parse_records;
use heatlens_recording_engine::{replay, GridLayout};

use super::{print_top_cells, render_snapshot, write_png, write_snapshot};

pub fn run(
    path: PathBuf,
    config: HeatmapConfig,
    snapshot_out: Option<PathBuf>,
    png_out: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Replaying: {}", path.display());

    let content = std::fs::read_to_string(&path)
        .map_err(|_| anyhow::anyhow!("Events file not found: {}", path.display()))?;
    let records =
        parse_records(&content).map_err(|e| anyhow::anyhow!("Failed to parse events: {e}"))?;
    println!("  Loaded {} records", records.len());

    let first_layout = records
        .iter()
        .find_map(|r| r.as_layout())
        .ok_or_else(|| anyhow::anyhow!("No layout record in {}", path.display()))?;
    let (width, height) = GridLayout::compute(&config, &first_layout)?.surface_size();
    let mut surface = PixelBuffer::new(width, height);

    let report = replay(&records, &config, &mut surface)?;
    let stats = &report.stats;

    println!("  Duration: {:.1}s", report.duration_ms as f64 / 1000.0);
    println!(
        "  Events: {} seen, {} binned",
        stats.events_seen, stats.events_binned
    );
    println!(
        "  Ticks: {} ({} drawn, {} idle, {} throttled)",
        report.ticks, stats.draws, stats.skipped_idle, stats.skipped_throttled
    );
    println!(
        "  Grid: {}x{} cells of {:.1}x{:.1}px",
        report.snapshot.cols(),
        report.snapshot.rows(),
        report.snapshot.cell_width(),
        report.snapshot.cell_height()
    );
    println!();
    println!("Hottest cells:");
    print_top_cells(&report.snapshot, config.top_n.unwrap_or(5));

    if let Some(out) = snapshot_out {
        write_snapshot(&report.snapshot, &out)?;
        println!("Snapshot saved to: {}", out.display());
    }
    if let Some(out) = png_out {
        let buffer = render_snapshot(&report.snapshot, &config)?;
        write_png(&buffer, &out)?;
        println!("Heatmap saved to: {}", out.display());
    }

    Ok(())
}
