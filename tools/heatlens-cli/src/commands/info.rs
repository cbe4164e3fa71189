//! Show snapshot information.

use std::path::PathBuf;

use heatlens_project_model::snapshot::HeatReport;

use super::{load_snapshot, print_top_cells};

pub fn run(path: PathBuf, top: usize, json: bool) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&path)?;
    let report = HeatReport::from_snapshot(&snapshot, top);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Snapshot: {}", path.display());
    println!(
        "  Grid: {}x{} cells of {:.1}x{:.1}px",
        report.cols, report.rows, report.cell_width, report.cell_height
    );
    println!("  Total interactions: {}", report.total_interactions);
    println!("  Max count: {}", report.max_count);
    println!(
        "  Top {} cover {:.1}% of interactions",
        report.top_cells.len(),
        report.coverage() * 100.0
    );
    println!();

    println!("Hottest cells:");
    print_top_cells(&snapshot, top);
    Ok(())
}
