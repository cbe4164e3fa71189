//! Accumulation grid for interaction heat.
//!
//! Document pixels are binned into `(col, row)` cells of a fixed pixel
//! size. Columns are sized to fit the viewport width; rows grow with the
//! document height. Counts are `f64` so weighted increments are possible.

use heatlens_common::error::{HeatError, HeatResult};
use heatlens_project_model::snapshot::{rank_top_cells, HeatCell, Snapshot};

/// Dense row-major accumulation grid.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatGrid {
    cols: usize,
    rows: usize,
    cell_width: f64,
    cell_height: f64,
    cells: Vec<f64>,
    /// Highest single-cell value; never below 1 after reset so
    /// normalization stays division-safe.
    max_count: f64,
}

impl HeatGrid {
    /// Allocate a zeroed grid.
    pub fn new(cols: usize, rows: usize, cell_width: f64, cell_height: f64) -> HeatResult<Self> {
        validate_dimensions(cols, rows, cell_width, cell_height)?;
        Ok(Self {
            cols,
            rows,
            cell_width,
            cell_height,
            cells: vec![0.0; cols * rows],
            max_count: 1.0,
        })
    }

    /// Rebuild a grid from an exported snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> HeatResult<Self> {
        snapshot
            .validate()
            .map_err(|e| HeatError::invalid_snapshot(e.to_string()))?;
        let max_count = if snapshot.max_count() > 0.0 {
            snapshot.max_count()
        } else {
            1.0
        };
        Ok(Self {
            cols: snapshot.cols(),
            rows: snapshot.rows(),
            cell_width: snapshot.cell_width(),
            cell_height: snapshot.cell_height(),
            cells: snapshot.grid_data().to_vec(),
            max_count,
        })
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

    pub fn max_count(&self) -> f64 {
        self.max_count
    }

    /// Row-major cell values.
    pub fn values(&self) -> &[f64] {
        &self.cells
    }

    /// Width and height covered by the grid, in document pixels.
    pub fn pixel_extent(&self) -> (f64, f64) {
        (
            self.cols as f64 * self.cell_width,
            self.rows as f64 * self.cell_height,
        )
    }

    /// Value at `(col, row)`, or `None` when out of bounds.
    pub fn cell(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    /// Derived record for the cell at `index`.
    pub fn heat_cell(&self, index: usize) -> Option<HeatCell> {
        let value = *self.cells.get(index)?;
        Some(HeatCell::from_index(
            index,
            value,
            self.cols,
            self.cell_width,
            self.cell_height,
        ))
    }

    /// Cell value divided by `max_count`, clamped to `[0, 1]`.
    pub fn normalized(&self, index: usize) -> f64 {
        let Some(value) = self.cells.get(index) else {
            return 0.0;
        };
        if self.max_count <= 0.0 {
            return 0.0;
        }
        (value / self.max_count).clamp(0.0, 1.0)
    }

    /// Iterate `(index, value)` over cells holding any heat.
    pub fn non_zero(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.cells
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| *v > 0.0)
    }

    /// Map document pixels to a row-major index.
    pub fn cell_index(&self, pixel_x: f64, pixel_y: f64) -> Option<usize> {
        let col = (pixel_x / self.cell_width).floor();
        let row = (pixel_y / self.cell_height).floor();
        // NaN fails both comparisons.
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        if col >= self.cols as f64 || row >= self.rows as f64 {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }

    /// Count one interaction at a document pixel.
    ///
    /// Returns `false` (and changes nothing) when the point is off-grid.
    pub fn add_heat(&mut self, pixel_x: f64, pixel_y: f64) -> bool {
        self.add_heat_weighted(pixel_x, pixel_y, 1.0)
    }

    /// Add `weight` to the cell under a document pixel.
    pub fn add_heat_weighted(&mut self, pixel_x: f64, pixel_y: f64, weight: f64) -> bool {
        if !weight.is_finite() || weight < 0.0 {
            return false;
        }
        let Some(index) = self.cell_index(pixel_x, pixel_y) else {
            return false;
        };
        let value = self.cells[index] + weight;
        self.cells[index] = value;
        if value > self.max_count {
            self.max_count = value;
        }
        true
    }

    /// Reallocate to new dimensions, keeping counts at the same `(row, col)`.
    ///
    /// Positions are not re-projected when the cell size changes: a cell
    /// keeps its index address even if it now covers different pixels.
    /// Cells outside the new bounds are dropped.
    pub fn resize(
        &mut self,
        new_cols: usize,
        new_rows: usize,
        new_cell_width: f64,
        new_cell_height: f64,
    ) -> HeatResult<()> {
        validate_dimensions(new_cols, new_rows, new_cell_width, new_cell_height)?;

        let mut cells = vec![0.0; new_cols * new_rows];
        let copy_rows = self.rows.min(new_rows);
        let copy_cols = self.cols.min(new_cols);
        for row in 0..copy_rows {
            for col in 0..copy_cols {
                cells[row * new_cols + col] = self.cells[row * self.cols + col];
            }
        }

        tracing::debug!(
            old_cols = self.cols,
            old_rows = self.rows,
            new_cols,
            new_rows,
            "Resized heat grid"
        );

        self.cols = new_cols;
        self.rows = new_rows;
        self.cell_width = new_cell_width;
        self.cell_height = new_cell_height;
        self.cells = cells;
        self.max_count = self.observed_max();
        Ok(())
    }

    /// Sum of all cells. O(n); for reporting only.
    pub fn total_interactions(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// The N hottest non-zero cells, hottest first, ties by index.
    pub fn top_cells(&self, n: usize) -> Vec<HeatCell> {
        rank_top_cells(&self.cells, self.cols, self.cell_width, self.cell_height, n)
    }

    /// Zero every cell.
    pub fn reset(&mut self) {
        self.cells.fill(0.0);
        self.max_count = 1.0;
    }

    /// Keep only the N hottest cells, zeroing the rest.
    pub fn show_top_cells_only(&mut self, n: usize) {
        let keep = self.top_cells(n);
        self.cells.fill(0.0);
        for cell in &keep {
            self.cells[cell.index] = cell.value;
        }
        self.max_count = self.observed_max();
    }

    /// Copy of this grid holding only the N hottest cells.
    pub fn top_cells_grid(&self, n: usize) -> Self {
        let mut filtered = self.clone();
        filtered.show_top_cells_only(n);
        filtered
    }

    /// Immutable export of the current state.
    pub fn snapshot(&self) -> HeatResult<Snapshot> {
        Snapshot::from_parts(
            self.cols,
            self.rows,
            self.cell_width,
            self.cell_height,
            self.max_count,
            self.cells.clone(),
        )
        .map_err(|e| HeatError::invalid_snapshot(e.to_string()))
    }

    fn observed_max(&self) -> f64 {
        let max = self.cells.iter().copied().fold(0.0_f64, f64::max);
        if max > 0.0 {
            max
        } else {
            1.0
        }
    }
}

fn validate_dimensions(
    cols: usize,
    rows: usize,
    cell_width: f64,
    cell_height: f64,
) -> HeatResult<()> {
    if cols == 0 || rows == 0 {
        return Err(HeatError::config(format!(
            "grid needs at least one column and row, got {cols}x{rows}"
        )));
    }
    if cols.checked_mul(rows).is_none() {
        return Err(HeatError::config(format!(
            "grid of {cols}x{rows} cells is too large"
        )));
    }
    if !cell_width.is_finite() || cell_width <= 0.0 {
        return Err(HeatError::config(format!(
            "cell width must be positive, got {cell_width}"
        )));
    }
    if !cell_height.is_finite() || cell_height <= 0.0 {
        return Err(HeatError::config(format!(
            "cell height must be positive, got {cell_height}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_10x10() -> HeatGrid {
        HeatGrid::new(10, 10, 20.0, 20.0).unwrap()
    }

    #[test]
    fn test_hotspot_end_to_end() {
        let mut grid = grid_10x10();
        for _ in 0..5 {
            assert!(grid.add_heat(25.0, 25.0));
        }

        assert_eq!(grid.cell(1, 1), Some(5.0));
        assert_eq!(grid.max_count(), 5.0);
        assert_eq!(grid.total_interactions(), 5.0);

        let top = grid.top_cells(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].index, 11);
        assert_eq!(top[0].value, 5.0);
        assert_eq!(top[0].column, 1);
        assert_eq!(top[0].row, 1);
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let mut grid = grid_10x10();
        assert!(!grid.add_heat(-1.0, 0.0));
        assert!(!grid.add_heat(200.0, 0.0));
        assert!(!grid.add_heat(0.0, 200.0));
        assert!(!grid.add_heat(f64::NAN, 5.0));
        assert!(!grid.add_heat(5.0, f64::INFINITY));
        assert_eq!(grid.total_interactions(), 0.0);
        assert_eq!(grid.max_count(), 1.0);
    }

    #[test]
    fn test_cell_edges_bin_to_lower_left() {
        let mut grid = grid_10x10();
        grid.add_heat(19.999, 0.0);
        grid.add_heat(20.0, 0.0);
        assert_eq!(grid.cell(0, 0), Some(1.0));
        assert_eq!(grid.cell(1, 0), Some(1.0));
    }

    #[test]
    fn test_weighted_increments() {
        let mut grid = grid_10x10();
        assert!(grid.add_heat_weighted(5.0, 5.0, 2.5));
        assert!(grid.add_heat_weighted(5.0, 5.0, 0.5));
        assert!(!grid.add_heat_weighted(5.0, 5.0, -1.0));
        assert!(!grid.add_heat_weighted(5.0, 5.0, f64::NAN));
        assert_eq!(grid.cell(0, 0), Some(3.0));
        assert_eq!(grid.max_count(), 3.0);
    }

    #[test]
    fn test_resize_grow_preserves_addresses() {
        let mut grid = grid_10x10();
        grid.add_heat(25.0, 25.0);
        grid.add_heat(195.0, 195.0);
        grid.add_heat(195.0, 195.0);

        grid.resize(12, 15, 20.0, 20.0).unwrap();
        assert_eq!(grid.values().len(), 12 * 15);
        assert_eq!(grid.cell(1, 1), Some(1.0));
        assert_eq!(grid.cell(9, 9), Some(2.0));
        assert_eq!(grid.total_interactions(), 3.0);
        assert_eq!(grid.max_count(), 2.0);
    }

    #[test]
    fn test_resize_shrink_truncates() {
        let mut grid = grid_10x10();
        grid.add_heat(25.0, 25.0);
        grid.add_heat(195.0, 195.0);
        grid.add_heat(195.0, 195.0);

        grid.resize(5, 5, 20.0, 20.0).unwrap();
        assert_eq!(grid.values().len(), 25);
        assert_eq!(grid.cell(1, 1), Some(1.0));
        assert_eq!(grid.total_interactions(), 1.0);
        assert_eq!(grid.max_count(), 1.0);
    }

    #[test]
    fn test_resize_keeps_index_alignment_when_cell_width_changes() {
        let mut grid = grid_10x10();
        grid.add_heat(45.0, 5.0); // col 2
        grid.resize(10, 10, 40.0, 20.0).unwrap();
        // Still col 2, which now starts at x = 80.
        assert_eq!(grid.cell(2, 0), Some(1.0));
        assert_eq!(grid.heat_cell(2).unwrap().pixel_x, 80.0);
    }

    #[test]
    fn test_resize_rejects_degenerate_dimensions() {
        let mut grid = grid_10x10();
        grid.add_heat(5.0, 5.0);
        assert!(grid.resize(0, 10, 20.0, 20.0).unwrap_err().is_config());
        assert!(grid.resize(10, 10, 0.0, 20.0).is_err());
        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.total_interactions(), 1.0);
    }

    #[test]
    fn test_reset_zeroes_and_restores_max() {
        let mut grid = grid_10x10();
        grid.add_heat(5.0, 5.0);
        grid.add_heat(5.0, 5.0);
        grid.reset();
        assert_eq!(grid.total_interactions(), 0.0);
        assert_eq!(grid.max_count(), 1.0);
    }

    #[test]
    fn test_top_cells_ties_keep_index_order() {
        let mut grid = grid_10x10();
        grid.add_heat(65.0, 5.0); // index 3
        grid.add_heat(5.0, 25.0); // index 10
        grid.add_heat(25.0, 5.0); // index 1
        let indices: Vec<usize> = grid.top_cells(10).iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 3, 10]);
    }

    #[test]
    fn test_show_top_cells_only() {
        let mut grid = grid_10x10();
        for _ in 0..3 {
            grid.add_heat(5.0, 5.0);
        }
        grid.add_heat(25.0, 5.0);
        grid.add_heat(25.0, 5.0);
        grid.add_heat(45.0, 5.0);

        grid.show_top_cells_only(2);
        assert_eq!(grid.cell(0, 0), Some(3.0));
        assert_eq!(grid.cell(1, 0), Some(2.0));
        assert_eq!(grid.cell(2, 0), Some(0.0));
        assert_eq!(grid.max_count(), 3.0);

        grid.show_top_cells_only(0);
        assert_eq!(grid.total_interactions(), 0.0);
        assert_eq!(grid.max_count(), 1.0);
    }

    #[test]
    fn test_top_cells_grid_leaves_original_untouched() {
        let mut grid = grid_10x10();
        grid.add_heat(5.0, 5.0);
        grid.add_heat(5.0, 5.0);
        grid.add_heat(25.0, 5.0);

        let filtered = grid.top_cells_grid(1);
        assert_eq!(filtered.total_interactions(), 2.0);
        assert_eq!(grid.total_interactions(), 3.0);
    }

    #[test]
    fn test_normalized_values() {
        let mut grid = grid_10x10();
        grid.add_heat(5.0, 5.0);
        grid.add_heat(5.0, 5.0);
        grid.add_heat(25.0, 5.0);
        assert_eq!(grid.normalized(0), 1.0);
        assert_eq!(grid.normalized(1), 0.5);
        assert_eq!(grid.normalized(2), 0.0);
        assert_eq!(grid.normalized(10_000), 0.0);
    }

    #[test]
    fn test_snapshot_roundtrip_through_grid() {
        let mut grid = grid_10x10();
        grid.add_heat(25.0, 25.0);
        grid.add_heat(25.0, 25.0);
        let snapshot = grid.snapshot().unwrap();
        assert_eq!(snapshot.cols(), 10);
        assert_eq!(snapshot.total_interactions(), 2.0);
        assert_eq!(snapshot.max_count(), 2.0);

        let restored = HeatGrid::from_snapshot(&snapshot).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn test_new_rejects_degenerate_dimensions() {
        assert!(HeatGrid::new(0, 1, 1.0, 1.0).is_err());
        assert!(HeatGrid::new(1, 0, 1.0, 1.0).is_err());
        assert!(HeatGrid::new(1, 1, f64::NAN, 1.0).is_err());
        assert!(HeatGrid::new(1, 1, 1.0, -2.0).is_err());
    }

    #[test]
    fn test_oversized_dimensions_are_config_errors() {
        assert!(HeatGrid::new(usize::MAX, 2, 1.0, 1.0).unwrap_err().is_config());

        let mut grid = grid_10x10();
        grid.add_heat(5.0, 5.0);
        assert!(grid.resize(usize::MAX, usize::MAX, 1.0, 1.0).unwrap_err().is_config());
        assert_eq!(grid.cell(0, 0), Some(1.0));
    }

    proptest! {
        #[test]
        fn prop_in_bounds_point_increments_exactly_its_cell(
            x in 0.0f64..200.0,
            y in 0.0f64..200.0,
        ) {
            let mut grid = grid_10x10();
            prop_assert!(grid.add_heat(x, y));
            let col = (x / 20.0).floor() as usize;
            let row = (y / 20.0).floor() as usize;
            prop_assert_eq!(grid.cell(col, row), Some(1.0));
            prop_assert_eq!(grid.non_zero().count(), 1);
            prop_assert_eq!(grid.total_interactions(), 1.0);
        }

        #[test]
        fn prop_max_count_tracks_true_max(
            points in proptest::collection::vec((0.0f64..200.0, 0.0f64..200.0), 1..64),
        ) {
            let mut grid = grid_10x10();
            let mut previous = grid.max_count();
            for (x, y) in points {
                grid.add_heat(x, y);
                prop_assert!(grid.max_count() >= previous);
                previous = grid.max_count();
            }
            let true_max = grid.values().iter().copied().fold(0.0_f64, f64::max);
            prop_assert_eq!(grid.max_count(), true_max);
        }

        #[test]
        fn prop_grow_preserves_every_cell(
            points in proptest::collection::vec((0.0f64..200.0, 0.0f64..200.0), 0..64),
            extra_cols in 1usize..5,
            extra_rows in 1usize..20,
        ) {
            let mut grid = grid_10x10();
            for (x, y) in points {
                grid.add_heat(x, y);
            }
            let before = grid.clone();
            grid.resize(10 + extra_cols, 10 + extra_rows, 20.0, 20.0).unwrap();
            for row in 0..10 {
                for col in 0..10 {
                    prop_assert_eq!(grid.cell(col, row), before.cell(col, row));
                }
            }
            prop_assert_eq!(grid.total_interactions(), before.total_interactions());
        }

        #[test]
        fn prop_top_cells_stable_under_filtering(
            points in proptest::collection::vec((0.0f64..200.0, 0.0f64..200.0), 0..64),
            n in 0usize..8,
        ) {
            let mut grid = grid_10x10();
            for (x, y) in points {
                grid.add_heat(x, y);
            }
            let top = grid.top_cells(n);
            grid.show_top_cells_only(n);
            prop_assert_eq!(grid.top_cells(n), top);
        }
    }
}
