//! Pairwise matrix assembly.
//!
//! Drives the origin x destination loop: one accumulated-cost sweep per
//! origin (via the [`OriginCache`]), one extraction per destination, one
//! entry per pair. Failures never abort the batch; they are recorded in
//! the entries they belong to.

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::OriginCache;
use crate::route;
use crate::solver::{Solver, TraversalParams};
use crate::surface::RasterCostSurface;

/// An identifiable location in one of the two input point sets.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Point {
    /// Stable identifier carried into the output table.
    pub id: i64,
    #[allow(missing_docs)]
    pub x: f64,
    #[allow(missing_docs)]
    pub y: f64,
}

impl Point {
    #[allow(missing_docs)]
    pub fn new(id: i64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

/// Outcome of a single (origin, destination) pairing.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum PathCost {
    /// Accumulated cost along the least-cost route.
    Cost(f32),
    /// No route exists under the current passability.
    Unreachable,
    /// The origin fell outside the raster, landed on an impassable cell,
    /// or its sweep failed.
    InvalidOrigin,
    /// The destination fell outside the raster.
    InvalidDestination,
}

impl PathCost {
    /// Numeric cost, if this pairing produced one.
    pub fn as_cost(&self) -> Option<f32> {
        match self {
            PathCost::Cost(cost) => Some(*cost),
            _ => None,
        }
    }
}

/// One entry of the output matrix.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct PathCostEntry {
    #[allow(missing_docs)]
    pub origin_id: i64,
    #[allow(missing_docs)]
    pub destination_id: i64,
    #[allow(missing_docs)]
    pub cost: PathCost,
}

/// Drives the origin x destination sweep.
#[derive(Clone, Debug, Default)]
pub struct MatrixAssembler {
    solver: Solver,
}

impl MatrixAssembler {
    #[allow(missing_docs)]
    pub fn new(params: TraversalParams) -> Self {
        Self {
            solver: Solver::new(params),
        }
    }

    /// Build the full matrix, origins outer, destinations inner.
    ///
    /// Both sets keep their input order, so row and column order of the
    /// result match the inputs. Every pair yields exactly one entry.
    pub fn build(
        &self,
        origins: &[Point],
        destinations: &[Point],
        surface: &RasterCostSurface,
    ) -> Vec<PathCostEntry> {
        let mut cache = OriginCache::new();
        let entries = self.build_with_cache(origins, destinations, surface, &mut cache);
        debug!(
            "Assembled {} entries with {} sweeps",
            entries.len(),
            cache.solves()
        );
        entries
    }

    pub(crate) fn build_with_cache(
        &self,
        origins: &[Point],
        destinations: &[Point],
        surface: &RasterCostSurface,
        cache: &mut OriginCache,
    ) -> Vec<PathCostEntry> {
        let mut entries = Vec::with_capacity(origins.len() * destinations.len());
        for origin in origins {
            entries.extend(self.sweep_origin(origin, destinations, surface, cache));
        }
        entries
    }

    /// Build the matrix sweeping independent origins across the rayon pool.
    ///
    /// Each worker owns the surface it solves, so no cache is shared and
    /// every origin costs exactly one sweep. Entry order is identical to
    /// [`build`](MatrixAssembler::build).
    pub fn par_build(
        &self,
        origins: &[Point],
        destinations: &[Point],
        surface: &RasterCostSurface,
    ) -> Vec<PathCostEntry> {
        debug!("Parallel build over {} origins", origins.len());
        origins
            .par_iter()
            .map(|origin| {
                let mut cache = OriginCache::new();
                self.sweep_origin(origin, destinations, surface, &mut cache)
            })
            .flatten()
            .collect()
    }

    /// All entries for one origin, in destination input order.
    fn sweep_origin(
        &self,
        origin: &Point,
        destinations: &[Point],
        surface: &RasterCostSurface,
        cache: &mut OriginCache,
    ) -> Vec<PathCostEntry> {
        let Some(origin_cell) = surface.locate(origin.x, origin.y) else {
            warn!("Origin {} lies outside the raster", origin.id);
            return Self::failed_origin(origin, destinations);
        };

        let solved = match cache.get_or_solve(&self.solver, surface, origin_cell) {
            Ok(solved) => solved,
            Err(err) => {
                warn!("Sweep failed for origin {}: {err}", origin.id);
                return Self::failed_origin(origin, destinations);
            }
        };

        let entries = destinations
            .iter()
            .map(|destination| {
                let cost = match surface.locate(destination.x, destination.y) {
                    None => PathCost::InvalidDestination,
                    Some(cell) => match route::extract_cost(solved, cell) {
                        Ok(Some(cost)) => PathCost::Cost(cost),
                        Ok(None) => PathCost::Unreachable,
                        Err(_) => PathCost::InvalidDestination,
                    },
                };
                PathCostEntry {
                    origin_id: origin.id,
                    destination_id: destination.id,
                    cost,
                }
            })
            .collect();

        cache.release(origin_cell);
        entries
    }

    fn failed_origin(origin: &Point, destinations: &[Point]) -> Vec<PathCostEntry> {
        destinations
            .iter()
            .map(|destination| PathCostEntry {
                origin_id: origin.id,
                destination_id: destination.id,
                cost: PathCost::InvalidOrigin,
            })
            .collect()
    }
}
