//! # Least-cost distance matrices over raster cost surfaces
//!
//! For every pair drawn from an origin point set and a destination point
//! set, computes the minimum accumulated traversal cost across a weighted
//! resistance raster (terrain slope, friction, ...) and collects the
//! results as a dense pairwise matrix.
//!
//! The expensive piece, sweeping an accumulated-cost surface out from one
//! origin, runs once per origin and is reused for every destination under
//! it, so total work is O(origins x cells) + O(origins x destinations).

mod cache;
mod error;
mod frontier;
mod matrix;
mod points;
mod raster;
mod route;
mod sink;
mod solver;
mod surface;

use std::fmt;

use tracing::debug;

pub use cache::OriginCache;
pub use error::{Error, Result};
pub use matrix::{MatrixAssembler, PathCost, PathCostEntry, Point};
pub use points::read_points;
pub use raster::load_cost_layer;
pub use route::{extract_cost, trace_route};
pub use sink::{CsvTableSink, OverwritePolicy, TableSink};
pub use solver::{
    AccumulatedCostSurface, Connectivity, Solver, TraversalParams, TraversalParamsBuilder,
};
pub use surface::{GridTransform, RasterCostSurface};

/// Cell address within the cost raster, row `i` first.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CellIndex {
    i: u64,
    j: u64,
}

impl CellIndex {
    #[allow(missing_docs)]
    pub fn new(i: u64, j: u64) -> Self {
        Self { i, j }
    }
}

impl From<CellIndex> for (u64, u64) {
    fn from(CellIndex { i, j }: CellIndex) -> (u64, u64) {
        (i, j)
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// Compute the full origin x destination cost matrix from a Zarr store.
///
/// Opens `store_path`, reads the cost layer named `layer`, and assembles
/// one [`PathCostEntry`] per (origin, destination) pair, origins in input
/// order outermost. Per-pair failures are recorded in the entries; only
/// store-level problems surface as errors.
pub fn cost_distance_matrix<P: AsRef<std::path::Path>>(
    store_path: P,
    layer: &str,
    transform: GridTransform,
    origins: &[Point],
    destinations: &[Point],
    params: TraversalParams,
) -> Result<Vec<PathCostEntry>> {
    let surface = load_cost_layer(store_path, layer, transform)?;
    debug!(
        "Assembling {} x {} matrix over a {:?} raster",
        origins.len(),
        destinations.len(),
        surface.dims()
    );
    let assembler = MatrixAssembler::new(params);
    Ok(assembler.build(origins, destinations, &surface))
}
