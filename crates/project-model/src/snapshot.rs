//! Grid export types.
//!
//! [`Snapshot`] is the wire contract expected by the backend submission
//! collaborator: field names and types must not change. [`HeatReport`] is
//! the compact top-N summary derived from it.

use serde::{Deserialize, Serialize};

/// Errors raised while validating an export.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("grid has zero columns or rows ({cols}x{rows})")]
    EmptyGrid { cols: usize, rows: usize },

    #[error("grid of {cols}x{rows} cells is too large")]
    TooLarge { cols: usize, rows: usize },

    #[error("gridData has {actual} entries, expected cols*rows = {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("cell size must be positive, got {width}x{height}")]
    InvalidCellSize { width: f64, height: f64 },

    #[error("cell {index} has invalid value {value}")]
    InvalidValue { index: usize, value: f64 },
}

/// A derived, read-only view of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatCell {
    /// Row-major index into the grid.
    pub index: usize,
    /// Accumulated count.
    pub value: f64,
    pub column: usize,
    pub row: usize,
    /// Left edge of the cell in document pixels.
    pub pixel_x: f64,
    /// Top edge of the cell in document pixels.
    pub pixel_y: f64,
}

impl HeatCell {
    /// Derive a cell record from its row-major index.
    pub fn from_index(
        index: usize,
        value: f64,
        cols: usize,
        cell_width: f64,
        cell_height: f64,
    ) -> Self {
        let cols = cols.max(1);
        let column = index % cols;
        let row = index / cols;
        Self {
            index,
            value,
            column,
            row,
            pixel_x: column as f64 * cell_width,
            pixel_y: row as f64 * cell_height,
        }
    }

    /// Center of the cell in document pixels.
    pub fn center(&self, cell_width: f64, cell_height: f64) -> (f64, f64) {
        (
            self.pixel_x + cell_width / 2.0,
            self.pixel_y + cell_height / 2.0,
        )
    }
}

/// Rank the non-zero cells of a row-major grid, hottest first.
///
/// The sort is stable, so equal values keep ascending index order.
pub fn rank_top_cells(
    values: &[f64],
    cols: usize,
    cell_width: f64,
    cell_height: f64,
    n: usize,
) -> Vec<HeatCell> {
    let mut ranked: Vec<HeatCell> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > 0.0)
        .map(|(i, v)| HeatCell::from_index(i, *v, cols, cell_width, cell_height))
        .collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(n);
    ranked
}

/// Immutable copy of grid state at the moment of export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    cols: usize,
    rows: usize,
    cell_width: f64,
    cell_height: f64,
    total_interactions: f64,
    max_count: f64,
    /// Row-major counts, length `cols * rows`.
    grid_data: Vec<f64>,
}

impl Snapshot {
    /// Build a validated snapshot. `totalInteractions` is derived from the data.
    pub fn from_parts(
        cols: usize,
        rows: usize,
        cell_width: f64,
        cell_height: f64,
        max_count: f64,
        grid_data: Vec<f64>,
    ) -> Result<Self, SnapshotError> {
        let snapshot = Self {
            cols,
            rows,
            cell_width,
            cell_height,
            total_interactions: grid_data.iter().sum(),
            max_count,
            grid_data,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Parse and validate a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SnapshotParseError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check shape and value invariants.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(SnapshotError::EmptyGrid {
                cols: self.cols,
                rows: self.rows,
            });
        }
        let expected = self
            .cols
            .checked_mul(self.rows)
            .ok_or(SnapshotError::TooLarge {
                cols: self.cols,
                rows: self.rows,
            })?;
        if self.grid_data.len() != expected {
            return Err(SnapshotError::LengthMismatch {
                expected,
                actual: self.grid_data.len(),
            });
        }
        let valid_size = |v: f64| v.is_finite() && v > 0.0;
        if !valid_size(self.cell_width) || !valid_size(self.cell_height) {
            return Err(SnapshotError::InvalidCellSize {
                width: self.cell_width,
                height: self.cell_height,
            });
        }
        if let Some((index, value)) = self
            .grid_data
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(SnapshotError::InvalidValue { index, value });
        }
        Ok(())
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    pub fn total_interactions(&self) -> f64 {
        self.total_interactions
    }

    pub fn max_count(&self) -> f64 {
        self.max_count
    }

    pub fn grid_data(&self) -> &[f64] {
        &self.grid_data
    }

    /// Value at `(col, row)`, or `None` when out of bounds.
    pub fn value(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.grid_data.get(row * self.cols + col).copied()
    }

    /// The N hottest non-zero cells.
    pub fn top_cells(&self, n: usize) -> Vec<HeatCell> {
        rank_top_cells(
            &self.grid_data,
            self.cols,
            self.cell_width,
            self.cell_height,
            n,
        )
    }
}

/// Failure to read a snapshot from JSON.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] SnapshotError),
}

/// Compact summary for upload and offline analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatReport {
    pub cols: usize,
    pub rows: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub total_interactions: f64,
    pub max_count: f64,
    pub top_cells: Vec<HeatCell>,
}

impl HeatReport {
    pub fn from_snapshot(snapshot: &Snapshot, top_n: usize) -> Self {
        Self {
            cols: snapshot.cols(),
            rows: snapshot.rows(),
            cell_width: snapshot.cell_width(),
            cell_height: snapshot.cell_height(),
            total_interactions: snapshot.total_interactions(),
            max_count: snapshot.max_count(),
            top_cells: snapshot.top_cells(top_n),
        }
    }

    /// Share of all interactions that landed in the reported cells.
    pub fn coverage(&self) -> f64 {
        if self.total_interactions <= 0.0 {
            return 0.0;
        }
        let covered: f64 = self.top_cells.iter().map(|c| c.value).sum();
        covered / self.total_interactions
    }
}
