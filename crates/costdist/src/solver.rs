//! Accumulated-cost sweep from a single origin cell.
//!
//! The solver expands a least-cost frontier out of the origin until every
//! reachable cell is settled, producing the accumulated cost to each cell
//! and a back-link raster from which any least-cost route can be rebuilt.

use std::collections::BinaryHeap;

use derive_builder::Builder;
use ndarray::Array2;
use tracing::{debug, trace};

use crate::frontier::FrontierNode;
use crate::surface::RasterCostSurface;
use crate::{CellIndex, Error, Result};

/// Neighborhood used when expanding a cell.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Connectivity {
    /// Orthogonal neighbors only.
    Four,
    /// Orthogonal and diagonal neighbors.
    #[default]
    Eight,
}

#[derive(Builder, Clone, Debug, Default)]
/// Parameters shared by every sweep of one matrix computation.
pub struct TraversalParams {
    #[builder(default)]
    connectivity: Connectivity,
    /// Upper bound on raster cells a single sweep may allocate for.
    #[builder(setter(strip_option), default)]
    cell_budget: Option<usize>,
}

impl TraversalParams {
    #[allow(missing_docs)]
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    #[allow(missing_docs)]
    pub fn cell_budget(&self) -> Option<usize> {
        self.cell_budget
    }
}

/// Row offset, column offset, and step-length factor of each neighbor,
/// in raster scan order. The table is symmetric under negation: entry `k`
/// points the opposite way from entry `7 - k`.
const NEIGHBORS: [(i64, i64, f64); 8] = [
    (-1, -1, std::f64::consts::SQRT_2),
    (-1, 0, 1.0),
    (-1, 1, std::f64::consts::SQRT_2),
    (0, -1, 1.0),
    (0, 1, 1.0),
    (1, -1, std::f64::consts::SQRT_2),
    (1, 0, 1.0),
    (1, 1, std::f64::consts::SQRT_2),
];

/// Sentinel for cells the sweep never reached.
pub(crate) const UNREACHED: u64 = u64::MAX;

// Costs are carried as integers to keep comparisons exact. Truncation at
// the 4th decimal place matches the precision the results are reported in.
const PRECISION_SCALAR: f32 = 1e4;

fn cost_as_u64(cost: f32) -> u64 {
    let cost = cost * PRECISION_SCALAR;
    cost as u64
}

fn unscaled_cost(cost: u64) -> f32 {
    (cost as f32) / PRECISION_SCALAR
}

/// Result of one accumulated-cost sweep.
///
/// Holds, for every settled cell, the accumulated cost from the origin and
/// a back-link direction code addressing the cell's least-cost predecessor.
/// Cells the frontier never reached keep an explicit sentinel and report as
/// unsettled, never as a plausible cost.
#[derive(Clone, Debug)]
pub struct AccumulatedCostSurface {
    origin: CellIndex,
    accumulated: Array2<u64>,
    backlink: Array2<u8>,
}

impl AccumulatedCostSurface {
    /// The origin cell this surface was swept from.
    pub fn origin(&self) -> CellIndex {
        self.origin
    }

    pub(crate) fn contains(&self, cell: CellIndex) -> bool {
        let (nrows, ncols) = self.accumulated.dim();
        (cell.i as usize) < nrows && (cell.j as usize) < ncols
    }

    /// Whether the sweep reached and finalized this cell.
    pub fn is_settled(&self, cell: CellIndex) -> bool {
        self.contains(cell) && self.accumulated[[cell.i as usize, cell.j as usize]] != UNREACHED
    }

    /// Accumulated cost from the origin; `None` when the cell was never
    /// reached or lies outside the grid.
    pub fn cost_at(&self, cell: CellIndex) -> Option<f32> {
        if !self.is_settled(cell) {
            return None;
        }
        Some(unscaled_cost(
            self.accumulated[[cell.i as usize, cell.j as usize]],
        ))
    }

    /// The least-cost predecessor of a settled cell, `None` at the origin.
    pub fn predecessor(&self, cell: CellIndex) -> Option<CellIndex> {
        if !self.is_settled(cell) {
            return None;
        }
        let code = self.backlink[[cell.i as usize, cell.j as usize]];
        if code == 0 {
            return None;
        }
        let (di, dj, _) = NEIGHBORS[code as usize - 1];
        let (i, j) = (cell.i as i64 + di, cell.j as i64 + dj);
        if i < 0 || j < 0 {
            return None;
        }
        Some(CellIndex {
            i: i as u64,
            j: j as u64,
        })
    }
}

/// Single-origin least-accumulated-cost solver.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    params: TraversalParams,
}

impl Solver {
    #[allow(missing_docs)]
    pub fn new(params: TraversalParams) -> Self {
        Self { params }
    }

    #[allow(missing_docs)]
    pub fn params(&self) -> &TraversalParams {
        &self.params
    }

    /// Sweep the whole raster from `origin`.
    ///
    /// The cheapest frontier cell settles first; once settled, a cell's
    /// accumulated cost is final and never revisited. Equal tentative
    /// costs settle in raster scan order. The cost of crossing between two
    /// cells is the mean of their traversal costs times the step length
    /// (cell size, or cell size x sqrt(2) diagonally).
    pub fn solve(
        &self,
        surface: &RasterCostSurface,
        origin: CellIndex,
    ) -> Result<AccumulatedCostSurface> {
        if !surface.is_passable(origin) {
            return Err(Error::InvalidOrigin(origin));
        }
        let (nrows, ncols) = surface.dims();
        let cells = nrows * ncols;
        if let Some(budget) = self.params.cell_budget {
            if cells > budget {
                return Err(Error::SolveBudgetExceeded { cells, budget });
            }
        }
        debug!("Sweeping {cells} cells from origin {origin}");

        let mut accumulated = Array2::from_elem((nrows, ncols), UNREACHED);
        let mut backlink = Array2::<u8>::zeros((nrows, ncols));
        let mut frontier = BinaryHeap::new();

        accumulated[[origin.i as usize, origin.j as usize]] = 0;
        frontier.push(FrontierNode {
            cell: origin,
            cost: 0,
            rank: surface.rank(origin),
        });

        let cell_size = surface.transform().cell_size();
        let mut settled = 0_usize;

        while let Some(FrontierNode { cell, cost, .. }) = frontier.pop() {
            // A cell is pushed once per incoming edge; later pops are stale.
            if cost > accumulated[[cell.i as usize, cell.j as usize]] {
                continue;
            }
            settled += 1;

            let Some(here) = surface.cost(cell) else {
                continue;
            };

            for (k, &(di, dj, factor)) in NEIGHBORS.iter().enumerate() {
                if self.params.connectivity == Connectivity::Four && di != 0 && dj != 0 {
                    continue;
                }
                let (ni, nj) = (cell.i as i64 + di, cell.j as i64 + dj);
                if ni < 0 || nj < 0 {
                    continue;
                }
                let neighbor = CellIndex {
                    i: ni as u64,
                    j: nj as u64,
                };
                let Some(there) = surface.cost(neighbor) else {
                    continue;
                };

                let step_length = (cell_size * factor) as f32;
                let tentative = cost + cost_as_u64(0.5 * (here + there) * step_length);
                let slot = &mut accumulated[[neighbor.i as usize, neighbor.j as usize]];
                if tentative < *slot {
                    *slot = tentative;
                    // Entry 7 - k points from the neighbor back at `cell`.
                    backlink[[neighbor.i as usize, neighbor.j as usize]] = (7 - k) as u8 + 1;
                    frontier.push(FrontierNode {
                        cell: neighbor,
                        cost: tentative,
                        rank: surface.rank(neighbor),
                    });
                }
            }
        }

        trace!("Settled {settled} of {cells} cells from origin {origin}");
        Ok(AccumulatedCostSurface {
            origin,
            accumulated,
            backlink,
        })
    }
}
