//! Heatmap recording session.

use serde::Serialize;

use heatlens_common::clock::{DrawThrottle, IdleGate, TimestampMs};
use heatlens_common::config::{HeatmapConfig, HeatmapConfigOverrides};
use heatlens_common::error::{HeatError, HeatResult};
use heatlens_processing_core::grid::HeatGrid;
use heatlens_project_model::event::{InteractionEvent, LayoutUpdate};
use heatlens_project_model::snapshot::Snapshot;
use heatlens_render_engine::{RenderOptions, RenderStats, Renderer, Surface};

use crate::layout::GridLayout;

/// State of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Created but not started.
    Idle,
    /// Accepting events and drawing.
    Recording,
    /// No activity within the idle window; draws are skipped until the
    /// next event.
    Paused,
    /// Stopped and exported. Terminal.
    Stopped,
}

impl SessionState {
    /// Whether events are accepted in this state.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }
}

/// What a draw tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session not started, or already stopped.
    NotRecording,
    /// No activity for longer than the idle window.
    Idle,
    /// Too soon after the previous draw.
    Throttled,
    Rendered(RenderStats),
    /// The host surface could not be acquired; the next tick retries.
    SurfaceUnavailable,
}

/// Running counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub events_seen: u64,
    pub events_binned: u64,
    pub draws: u64,
    pub skipped_idle: u64,
    pub skipped_throttled: u64,
    pub surface_failures: u64,
}

/// A single heatmap recording.
///
/// The session owns its grid. Events and ticks are fed in by the host on
/// one timeline of millisecond timestamps; the session never schedules
/// anything itself.
#[derive(Debug)]
pub struct HeatmapSession {
    config: HeatmapConfig,
    state: SessionState,
    grid: Option<HeatGrid>,
    layout: Option<GridLayout>,
    renderer: Renderer,
    throttle: DrawThrottle,
    idle: IdleGate,
    stats: SessionStats,
}

impl HeatmapSession {
    /// Create an unstarted session.
    pub fn new(config: HeatmapConfig) -> HeatResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer: Renderer::new(RenderOptions::from_config(&config)),
            throttle: DrawThrottle::new(config.draw_interval_ms),
            idle: IdleGate::new(config.idle_ms, 0),
            config,
            state: SessionState::Idle,
            grid: None,
            layout: None,
            stats: SessionStats::default(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn config(&self) -> &HeatmapConfig {
        &self.config
    }

    pub fn layout(&self) -> Option<GridLayout> {
        self.layout
    }

    /// The live grid; `None` before start and after stop.
    pub fn grid(&self) -> Option<&HeatGrid> {
        self.grid.as_ref()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Allocate the grid for the given layout and begin recording.
    pub fn start(&mut self, layout: &LayoutUpdate, now_ms: TimestampMs) -> HeatResult<()> {
        if self.state != SessionState::Idle {
            return Err(HeatError::session("Session already started"));
        }

        let computed = GridLayout::compute(&self.config, layout)?;
        let grid = HeatGrid::new(
            computed.cols,
            computed.rows,
            computed.cell_width,
            computed.cell_height,
        )?;

        tracing::info!(
            cols = computed.cols,
            rows = computed.rows,
            cell_width = computed.cell_width,
            cell_height = computed.cell_height,
            shape = %self.config.shape,
            "Starting heatmap session"
        );

        self.grid = Some(grid);
        self.layout = Some(computed);
        self.idle = IdleGate::new(self.config.idle_ms, now_ms);
        self.throttle.reset();
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Count one interaction. Returns whether it landed on the grid.
    ///
    /// Any event, binned or not, counts as activity and wakes a paused
    /// session. Events before start or after stop are ignored.
    pub fn handle_event(&mut self, event: &InteractionEvent) -> bool {
        if !self.state.is_active() {
            return false;
        }
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };

        self.stats.events_seen += 1;
        self.idle.record_activity(event.timestamp_ms);
        if self.state == SessionState::Paused {
            tracing::debug!(at_ms = event.timestamp_ms, "Resuming after idle");
            self.state = SessionState::Recording;
        }

        let binned = grid.add_heat(event.document_x, event.document_y);
        if binned {
            self.stats.events_binned += 1;
        }
        binned
    }

    /// One draw-timer tick.
    ///
    /// Idle is checked before the throttle, so idle ticks do not use up a
    /// draw slot. Surface failures are reported through the outcome; any
    /// other render error is returned.
    pub fn tick<S: Surface + ?Sized>(
        &mut self,
        now_ms: TimestampMs,
        surface: &mut S,
    ) -> HeatResult<TickOutcome> {
        if !self.state.is_active() {
            return Ok(TickOutcome::NotRecording);
        }

        if self.idle.is_idle(now_ms) {
            if self.state == SessionState::Recording {
                tracing::info!(
                    idle_ms = self.config.idle_ms,
                    last_activity_ms = self.idle.last_activity_ms(),
                    "Pausing heatmap draws"
                );
                self.state = SessionState::Paused;
            }
            self.stats.skipped_idle += 1;
            return Ok(TickOutcome::Idle);
        }
        // Activity window widened by an option change.
        if self.state == SessionState::Paused {
            self.state = SessionState::Recording;
        }

        if !self.throttle.should_fire(now_ms) {
            self.stats.skipped_throttled += 1;
            return Ok(TickOutcome::Throttled);
        }

        let Some(grid) = self.grid.as_ref() else {
            return Ok(TickOutcome::NotRecording);
        };

        match self.renderer.draw(grid, surface) {
            Ok(stats) => {
                self.stats.draws += 1;
                Ok(TickOutcome::Rendered(stats))
            }
            Err(HeatError::SurfaceUnavailable { message }) => {
                tracing::warn!(at_ms = now_ms, reason = %message, "Render surface unavailable");
                self.stats.surface_failures += 1;
                self.throttle.reset();
                Ok(TickOutcome::SurfaceUnavailable)
            }
            Err(e) => Err(e),
        }
    }

    /// Re-derive the grid shape for a new layout, keeping counts.
    ///
    /// Invalid dimensions leave the grid untouched.
    pub fn resize(&mut self, layout: &LayoutUpdate) -> HeatResult<()> {
        if !self.state.is_active() {
            return Err(HeatError::session("Session not recording"));
        }
        let computed = GridLayout::compute(&self.config, layout)?;
        let grid = self
            .grid
            .as_mut()
            .ok_or_else(|| HeatError::session("Session has no grid"))?;
        grid.resize(
            computed.cols,
            computed.rows,
            computed.cell_width,
            computed.cell_height,
        )?;

        tracing::info!(
            viewport_width = layout.viewport_width,
            document_height = layout.document_height,
            cols = computed.cols,
            rows = computed.rows,
            "Resized heatmap session"
        );
        self.layout = Some(computed);
        Ok(())
    }

    /// Export the current counts without stopping.
    pub fn snapshot(&self) -> HeatResult<Snapshot> {
        self.grid
            .as_ref()
            .ok_or_else(|| HeatError::session("Session has no grid"))?
            .snapshot()
    }

    /// Stop recording and export the final counts.
    ///
    /// The state becomes `Stopped` before the grid is released, so events
    /// and ticks arriving afterwards are ignored.
    pub fn stop(&mut self) -> HeatResult<Snapshot> {
        if !self.state.is_active() {
            return Err(HeatError::session("Session not recording"));
        }
        self.state = SessionState::Stopped;

        let grid = self
            .grid
            .take()
            .ok_or_else(|| HeatError::session("Session has no grid"))?;
        let snapshot = grid.snapshot()?;

        tracing::info!(
            total_interactions = snapshot.total_interactions(),
            max_count = snapshot.max_count(),
            draws = self.stats.draws,
            events_seen = self.stats.events_seen,
            "Heatmap session stopped"
        );
        Ok(snapshot)
    }

    /// Change options between draws.
    ///
    /// Render and timing options apply to the next tick. Layout options
    /// (`maxCols`, `maxRows`, `cellHeight`) apply on the next resize.
    pub fn update_options(&mut self, overrides: &HeatmapConfigOverrides) -> HeatResult<()> {
        if overrides.is_empty() {
            return Ok(());
        }
        let candidate = self.config.with_overrides(overrides);
        candidate.validate()?;

        self.renderer.apply_overrides(overrides);
        self.throttle.set_interval_ms(candidate.draw_interval_ms);
        self.idle.set_idle_ms(candidate.idle_ms);
        self.config = candidate;
        tracing::debug!(shape = %self.config.shape, "Updated heatmap options");
        Ok(())
    }
}
