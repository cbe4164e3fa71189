//! Record a heatmap live from JSONL records on stdin.
//!
//! Record timestamps from the stream are ignored; every record is stamped
//! with its arrival time so events and draw ticks share one clock.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use heatlens_common::clock::RecordingClock;
use heatlens_common::config::HeatmapConfig;
use heatlens_processing_core::pixel::PixelBuffer;
use heatlens_project_model::event::{
    parse_record_line, InteractionEvent, LayoutUpdate, RecordKind,
};
use heatlens_recording_engine::{HeatmapSession, TickOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use super::{print_top_cells, render_snapshot, write_png, write_snapshot};

pub async fn run(
    config: HeatmapConfig,
    viewport_width: f64,
    document_height: f64,
    snapshot_out: Option<PathBuf>,
    png_out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut session = HeatmapSession::new(config.clone())?;
    let clock = RecordingClock::start();
    session.start(
        &LayoutUpdate::new(viewport_width, document_height),
        clock.elapsed_ms(),
    )?;
    let mut surface = new_surface(&session);

    println!("Recording heatmap ({} mode)", config.shape);
    println!("  Viewport: {viewport_width}x{document_height}");
    println!("  Started: {}", clock.epoch_wall());
    println!("Reading records from stdin; EOF or Ctrl+C stops.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(config.draw_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match classify_line(line) {
                    StdinLine::Text(line) => line,
                    StdinLine::Skip => continue,
                    StdinLine::End => break,
                };
                let record = match parse_record_line(&line) {
                    Ok(Some(record)) => record,
                    Ok(None) => continue,
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping malformed record");
                        continue;
                    }
                };
                let now = clock.elapsed_ms();
                match record.kind {
                    RecordKind::Interaction { document_x, document_y } => {
                        session.handle_event(&InteractionEvent::new(document_x, document_y, now));
                    }
                    RecordKind::Layout { viewport_width, document_height } => {
                        match session.resize(&LayoutUpdate::new(viewport_width, document_height)) {
                            Ok(()) => surface = new_surface(&session),
                            Err(e) => tracing::warn!(error = %e, "Ignoring invalid layout record"),
                        }
                    }
                }
            }
            _ = ticker.tick() => {
                match session.tick(clock.elapsed_ms(), &mut surface) {
                    Ok(TickOutcome::Rendered(stats)) => {
                        tracing::trace!(cells_drawn = stats.cells_drawn, "Frame drawn");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "Draw failed, stopping recording");
                        break;
                    }
                }
            }
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Ctrl+C handler failed");
                }
                println!();
                break;
            }
        }
    }

    let stats = session.stats();
    let snapshot = session.stop()?;

    println!(
        "Recorded {} events ({} binned) over {:.1}s, {} draws",
        stats.events_seen,
        stats.events_binned,
        clock.elapsed_ms() as f64 / 1000.0,
        stats.draws
    );
    println!("Hottest cells:");
    print_top_cells(&snapshot, config.top_n.unwrap_or(5));

    if let Some(out) = snapshot_out {
        write_snapshot(&snapshot, &out)?;
        println!("Snapshot saved to: {}", out.display());
    }
    if let Some(out) = png_out {
        let buffer = render_snapshot(&snapshot, &config)?;
        write_png(&buffer, &out)?;
        println!("Heatmap saved to: {}", out.display());
    }

    Ok(())
}

/// What the record loop does with one read from stdin.
#[derive(Debug, PartialEq)]
enum StdinLine {
    Text(String),
    Skip,
    End,
}

/// Undecodable lines are skipped; EOF and read failures end the recording
/// so the snapshot is still exported.
fn classify_line(line: std::io::Result<Option<String>>) -> StdinLine {
    match line {
        Ok(Some(line)) => StdinLine::Text(line),
        Ok(None) => {
            tracing::debug!("stdin closed");
            StdinLine::End
        }
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            tracing::warn!(error = %e, "Skipping undecodable line");
            StdinLine::Skip
        }
        Err(e) => {
            tracing::warn!(error = %e, "Reading stdin failed, stopping recording");
            StdinLine::End
        }
    }
}

fn new_surface(session: &HeatmapSession) -> PixelBuffer {
    let (w, h) = session
        .layout()
        .map(|layout| layout.surface_size())
        .unwrap_or((0, 0));
    PixelBuffer::new(w, h)
}
