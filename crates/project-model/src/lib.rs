//! Heatlens Project Model
//!
//! Defines the data contracts exchanged with collaborators outside the
//! heatmap core:
//! - **Records:** Timestamped interaction and layout records (JSONL)
//! - **Cells:** Derived, read-only views of a single grid cell
//! - **Snapshot:** The immutable grid export consumed by the upload backend
//!
//! All coordinates are document pixels: scroll offset is already applied,
//! so binning stays stable while the user scrolls.

pub mod event;
pub mod snapshot;

pub use event::*;
pub use snapshot::*;
