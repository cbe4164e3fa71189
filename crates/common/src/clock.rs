//! Clock and timing utilities for the draw loop.
//!
//! The heatmap session is driven by millisecond timestamps supplied by the
//! host (event timestamps and draw-tick times share one timeline). This
//! module provides:
//! - A recording clock for hosts that need to stamp events themselves
//! - A draw throttle that skips (never reschedules) early ticks
//! - An idle gate based on a single timestamp comparison

use std::time::Instant;

pub use heatlens_project_model::event::TimestampMs;

/// A recording clock that provides monotonic millisecond timestamps
/// relative to a fixed epoch (the moment recording started).
#[derive(Debug, Clone)]
pub struct RecordingClock {
    /// The instant recording started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl RecordingClock {
    /// Create a new recording clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since recording start.
    pub fn elapsed_ms(&self) -> TimestampMs {
        self.epoch.elapsed().as_millis() as TimestampMs
    }

    /// Wall-clock time at recording start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Throttle for the periodic draw call.
///
/// A tick that arrives within `interval_ms` of the last accepted tick is
/// rejected outright. Nothing is queued.
#[derive(Debug, Clone)]
pub struct DrawThrottle {
    interval_ms: u64,
    last_fire_ms: Option<TimestampMs>,
}

impl DrawThrottle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
        }
    }

    /// Check if enough time has passed for the next draw.
    /// Returns true and records the tick if ready.
    /// The first call always returns true.
    pub fn should_fire(&mut self, now_ms: TimestampMs) -> bool {
        match self.last_fire_ms {
            None => {
                self.last_fire_ms = Some(now_ms);
                true
            }
            Some(last) if now_ms >= last.saturating_add(self.interval_ms) => {
                self.last_fire_ms = Some(now_ms);
                true
            }
            _ => false,
        }
    }

    /// Change the interval without forgetting the last accepted tick.
    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Forget the last accepted tick so the next call fires.
    pub fn reset(&mut self) {
        self.last_fire_ms = None;
    }
}

/// Idle detection by timestamp comparison.
#[derive(Debug, Clone)]
pub struct IdleGate {
    idle_ms: u64,
    last_activity_ms: TimestampMs,
}

impl IdleGate {
    pub fn new(idle_ms: u64, now_ms: TimestampMs) -> Self {
        Self {
            idle_ms,
            last_activity_ms: now_ms,
        }
    }

    /// Record qualifying activity. Out-of-order timestamps never move the
    /// activity mark backwards.
    pub fn record_activity(&mut self, at_ms: TimestampMs) {
        self.last_activity_ms = self.last_activity_ms.max(at_ms);
    }

    /// Whether more than `idle_ms` has elapsed since the last activity.
    pub fn is_idle(&self, now_ms: TimestampMs) -> bool {
        now_ms.saturating_sub(self.last_activity_ms) > self.idle_ms
    }

    pub fn last_activity_ms(&self) -> TimestampMs {
        self.last_activity_ms
    }

    pub fn set_idle_ms(&mut self, idle_ms: u64) {
        self.idle_ms = idle_ms;
    }
}
