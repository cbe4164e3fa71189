//! Heatlens Recording Engine
//!
//! Owns the accumulation grid for the lifetime of one recording and
//! decides when the renderer runs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                HeatmapSession                 │
//! │                                               │
//! │  interaction ──► IdleGate ──► HeatGrid        │
//! │                                  │            │
//! │  tick ──► IdleGate ──► DrawThrottle ──► Renderer ──► Surface
//! │                                  │            │
//! │  stop ─────────────────────► Snapshot         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Every event is counted. Only draws are skipped, either because the
//! session is idle or because the last draw was too recent.

pub mod layout;
pub mod replay;
pub mod session;

pub use layout::GridLayout;
pub use replay::{replay, ReplayReport};
pub use session::*;
