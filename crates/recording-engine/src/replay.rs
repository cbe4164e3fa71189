//! Drive a session from a recorded record stream.
//!
//! The stream carries its own timeline, so draw ticks are synthesized on
//! that timeline every `draw_interval_ms` instead of waiting on a timer.

use serde::Serialize;

use heatlens_common::clock::TimestampMs;
use heatlens_common::config::HeatmapConfig;
use heatlens_common::error::{HeatError, HeatResult};
use heatlens_project_model::event::{InteractionEvent, LayoutUpdate, RecordKind, StreamRecord};
use heatlens_project_model::snapshot::Snapshot;
use heatlens_render_engine::Surface;

use crate::session::{HeatmapSession, SessionStats};

/// Result of replaying one stream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub snapshot: Snapshot,
    pub stats: SessionStats,
    /// Records applied to the session.
    pub records_applied: usize,
    /// Records seen before the first layout record.
    pub records_skipped: usize,
    /// Draw ticks synthesized on the record timeline.
    pub ticks: u64,
    /// Timestamp span from the first layout record to the last record.
    pub duration_ms: TimestampMs,
}

/// Replay `records` in order and return the final snapshot.
///
/// The first layout record starts the session. Before each later record
/// every tick due at or before its timestamp is run. A last tick after
/// the final record draws the end state before the session stops.
pub fn replay<S: Surface + ?Sized>(
    records: &[StreamRecord],
    config: &HeatmapConfig,
    surface: &mut S,
) -> HeatResult<ReplayReport> {
    let mut session = HeatmapSession::new(config.clone())?;
    let step = config.draw_interval_ms.max(1);

    let mut next_tick: Option<TimestampMs> = None;
    let mut start_ms: TimestampMs = 0;
    let mut last_ms: TimestampMs = 0;
    let mut applied = 0usize;
    let mut skipped = 0usize;
    let mut ticks = 0u64;

    for record in records {
        let ts = record.timestamp_ms;

        let Some(mut due) = next_tick else {
            match record.as_layout() {
                Some(layout) => {
                    session.start(&layout, ts)?;
                    start_ms = ts;
                    last_ms = ts;
                    next_tick = Some(ts.saturating_add(step));
                    applied += 1;
                }
                None => skipped += 1,
            }
            continue;
        };

        while due <= ts {
            session.tick(due, surface)?;
            ticks += 1;
            due = due.saturating_add(step);
        }
        next_tick = Some(due);

        match record.kind {
            RecordKind::Interaction {
                document_x,
                document_y,
            } => {
                session.handle_event(&InteractionEvent::new(document_x, document_y, ts));
            }
            RecordKind::Layout {
                viewport_width,
                document_height,
            } => {
                let layout = LayoutUpdate::new(viewport_width, document_height);
                if let Err(e) = session.resize(&layout) {
                    tracing::warn!(at_ms = ts, error = %e, "Ignoring invalid layout record");
                }
            }
        }
        applied += 1;
        last_ms = last_ms.max(ts);
    }

    let Some(due) = next_tick else {
        return Err(HeatError::session(
            "stream has no layout record to start the session",
        ));
    };
    session.tick(due, surface)?;
    ticks += 1;

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped records before the first layout");
    }

    let stats = session.stats();
    let snapshot = session.stop()?;
    Ok(ReplayReport {
        snapshot,
        stats,
        records_applied: applied,
        records_skipped: skipped,
        ticks,
        duration_ms: last_ms.saturating_sub(start_ms),
    })
}
