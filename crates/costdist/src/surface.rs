//! The raster cost surface and its world-coordinate mapping.

use ndarray::Array2;
use tracing::trace;

use crate::CellIndex;

/// Mapping between world coordinates and cell addresses.
///
/// Row 0 is the northernmost row: `x` grows with columns from `x_min`,
/// `y` shrinks with rows from `y_max`. Cells are square.
#[derive(Clone, Copy, Debug)]
pub struct GridTransform {
    x_min: f64,
    y_max: f64,
    cell_size: f64,
}

impl GridTransform {
    #[allow(missing_docs)]
    pub fn new(x_min: f64, y_max: f64, cell_size: f64) -> Self {
        Self {
            x_min,
            y_max,
            cell_size,
        }
    }

    /// Edge length of one cell in world units.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cell column/row reached by a world coordinate, unbounded.
    ///
    /// Negative results mean the point lies west/north of the grid.
    fn offsets(&self, x: f64, y: f64) -> (i64, i64) {
        let i = ((self.y_max - y) / self.cell_size).floor() as i64;
        let j = ((x - self.x_min) / self.cell_size).floor() as i64;
        (i, j)
    }
}

/// Immutable grid of per-cell traversal costs.
///
/// Impassable cells (no-data in the source raster) carry NaN; every other
/// cell holds a non-negative traversal cost. The surface never changes for
/// the lifetime of a matrix computation, so it can be shared freely across
/// concurrent sweeps.
#[derive(Clone, Debug)]
pub struct RasterCostSurface {
    cost: Array2<f32>,
    transform: GridTransform,
}

impl RasterCostSurface {
    /// Wrap a cost grid, mapping negative and non-finite values to the
    /// impassable sentinel.
    pub fn new(cost: Array2<f32>, transform: GridTransform) -> Self {
        let cost = cost.mapv(|v| if v.is_finite() && v >= 0.0 { v } else { f32::NAN });
        Self { cost, transform }
    }

    /// (rows, columns) of the grid.
    pub fn dims(&self) -> (usize, usize) {
        self.cost.dim()
    }

    #[allow(missing_docs)]
    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    pub(crate) fn contains(&self, cell: CellIndex) -> bool {
        let (nrows, ncols) = self.dims();
        (cell.i as usize) < nrows && (cell.j as usize) < ncols
    }

    /// Traversal cost of a cell; `None` when out of bounds or impassable.
    pub fn cost(&self, cell: CellIndex) -> Option<f32> {
        self.cost
            .get([cell.i as usize, cell.j as usize])
            .copied()
            .filter(|v| v.is_finite())
    }

    pub(crate) fn is_passable(&self, cell: CellIndex) -> bool {
        self.cost(cell).is_some()
    }

    /// Row-major position of a cell, used as the settlement tie-breaker.
    pub(crate) fn rank(&self, cell: CellIndex) -> u64 {
        let (_, ncols) = self.dims();
        cell.i * ncols as u64 + cell.j
    }

    /// Resolve a world coordinate into the cell containing it.
    pub fn locate(&self, x: f64, y: f64) -> Option<CellIndex> {
        let (i, j) = self.transform.offsets(x, y);
        trace!("Located ({x}, {y}) at row {i}, column {j}");
        let (nrows, ncols) = self.dims();
        if i < 0 || j < 0 || i as usize >= nrows || j as usize >= ncols {
            return None;
        }
        Some(CellIndex {
            i: i as u64,
            j: j as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn three_by_four() -> RasterCostSurface {
        let cost = Array2::from_elem((3, 4), 1.0);
        RasterCostSurface::new(cost, GridTransform::new(100.0, 200.0, 10.0))
    }

    #[test]
    fn locate_cell_centers() {
        let surface = three_by_four();
        assert_eq!(surface.locate(105.0, 195.0), Some(CellIndex::new(0, 0)));
        assert_eq!(surface.locate(135.0, 175.0), Some(CellIndex::new(2, 3)));
    }

    #[test]
    fn locate_northwest_corner_lands_in_first_cell() {
        let surface = three_by_four();
        assert_eq!(surface.locate(100.0, 200.0), Some(CellIndex::new(0, 0)));
    }

    #[test]
    fn locate_outside_grid() {
        let surface = three_by_four();
        assert_eq!(surface.locate(99.0, 195.0), None);
        assert_eq!(surface.locate(105.0, 201.0), None);
        assert_eq!(surface.locate(141.0, 195.0), None);
        assert_eq!(surface.locate(105.0, 169.0), None);
    }

    #[test]
    fn negative_and_nan_costs_are_impassable() {
        let cost = array![[1.0, -3.0], [f32::NAN, 0.0]];
        let surface = RasterCostSurface::new(cost, GridTransform::new(0.0, 2.0, 1.0));
        assert_eq!(surface.cost(CellIndex::new(0, 0)), Some(1.0));
        assert_eq!(surface.cost(CellIndex::new(0, 1)), None);
        assert_eq!(surface.cost(CellIndex::new(1, 0)), None);
        assert_eq!(surface.cost(CellIndex::new(1, 1)), Some(0.0));
        assert!(!surface.is_passable(CellIndex::new(0, 1)));
    }

    #[test]
    fn cost_out_of_bounds_is_none() {
        let surface = three_by_four();
        assert_eq!(surface.cost(CellIndex::new(3, 0)), None);
        assert!(!surface.contains(CellIndex::new(0, 4)));
    }

    #[test]
    fn rank_is_row_major() {
        let surface = three_by_four();
        assert_eq!(surface.rank(CellIndex::new(0, 0)), 0);
        assert_eq!(surface.rank(CellIndex::new(0, 3)), 3);
        assert_eq!(surface.rank(CellIndex::new(1, 0)), 4);
        assert_eq!(surface.rank(CellIndex::new(2, 3)), 11);
    }
}
