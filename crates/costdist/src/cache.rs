//! Per-origin reuse of solved surfaces.
//!
//! Solving is O(cells); extracting one destination is O(1). Memoizing the
//! solved surface per origin keeps the whole matrix at O(origins) solves
//! instead of O(origins x destinations).

use tracing::{debug, trace};

use crate::solver::{AccumulatedCostSurface, Solver};
use crate::surface::RasterCostSurface;
use crate::{CellIndex, Result};

/// Keeps the solved surface for the origin currently being swept.
///
/// At most one solved surface is resident at a time, bounding the working
/// set to a single accumulated-cost grid. The assembler calls [`release`]
/// once it has extracted every destination for an origin.
///
/// [`release`]: OriginCache::release
#[derive(Debug, Default)]
pub struct OriginCache {
    resident: Option<(CellIndex, AccumulatedCostSurface)>,
    solves: usize,
}

impl OriginCache {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the solved surface for `origin`, sweeping it first on a miss.
    ///
    /// A miss evicts whatever was resident before the new sweep starts, so
    /// a failed solve leaves the cache empty rather than serving a stale
    /// surface.
    pub fn get_or_solve(
        &mut self,
        solver: &Solver,
        surface: &RasterCostSurface,
        origin: CellIndex,
    ) -> Result<&AccumulatedCostSurface> {
        if matches!(&self.resident, Some((resident_origin, _)) if *resident_origin == origin) {
            trace!("Cache hit for origin {origin}");
            return Ok(&self.resident.as_ref().unwrap().1);
        }
        self.resident.take();
        debug!("Cache miss, sweeping origin {origin}");
        let solved = solver.solve(surface, origin)?;
        self.solves += 1;
        Ok(&self.resident.insert((origin, solved)).1)
    }

    /// Drop the resident surface if it belongs to `origin`.
    pub fn release(&mut self, origin: CellIndex) {
        if matches!(&self.resident, Some((resident_origin, _)) if *resident_origin == origin) {
            trace!("Releasing solved surface for origin {origin}");
            self.resident = None;
        }
    }

    /// Number of times the solver actually ran.
    pub fn solves(&self) -> usize {
        self.solves
    }
}
