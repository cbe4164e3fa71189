//! Heatlens Common Utilities
//!
//! Shared infrastructure for all Heatlens crates:
//! - Error types and result aliases
//! - Draw throttling, idle detection, and the recording clock
//! - Tracing/logging initialization
//! - Engine configuration loading and merging

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
