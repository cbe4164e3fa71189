//! Heatlens Processing Core
//!
//! The data side of the interaction heatmap:
//! - **Grid:** Dense accumulation counters binned from document pixels
//! - **Color:** Fixed cool-to-hot ramp and radial gradient builder
//! - **Blur:** Two-pass separable box blur with clamped edges
//! - **Pixel:** RGBA8 buffers the blur and renderer operate on
//!
//! This crate is pure computation. No I/O, no clocks, no surfaces.

pub mod blur;
pub mod color;
pub mod grid;
pub mod pixel;

pub use blur::box_blur;
pub use color::{ColorRamp, ColorStop, RadialGradient, Rgba};
pub use grid::HeatGrid;
pub use pixel::PixelBuffer;
