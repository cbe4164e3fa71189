//! Heatlens Render Engine
//!
//! Draws an accumulation grid onto a host-provided pixel surface.
//!
//! # Pipeline Architecture
//!
//! ```text
//! flat modes:
//!   grid ── normalize ── color ramp ── circle / rect fill ──► surface
//!
//! gradient mode:
//!   grid ── accumulate ──► buffer ── blur ──► buffer ── colorize ──► buffer
//!           (additive                (box)               (ramp)       │
//!            radial gradients)                                        ▼
//!                                                        source-over ► surface
//! ```
//!
//! The renderer keeps configuration only. Every call reads the grid it is
//! given and allocates fresh intermediate buffers, so a resize between two
//! draws can never leave a stale buffer behind.

pub mod compositor;
pub mod options;
pub mod pipeline;
pub mod renderer;
pub mod surface;

pub use options::RenderOptions;
pub use pipeline::GradientPipeline;
pub use renderer::{RenderStats, Renderer};
pub use surface::Surface;
