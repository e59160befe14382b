//! Reading costs and routes back out of a solved surface.

use crate::solver::AccumulatedCostSurface;
use crate::{CellIndex, Error, Result};

/// Accumulated cost of the least-cost route to `destination`.
///
/// `Ok(None)` means the destination was never settled: no route exists
/// under the current passability. That is a valid outcome, not an error;
/// only a destination outside the grid fails.
pub fn extract_cost(
    accumulated: &AccumulatedCostSurface,
    destination: CellIndex,
) -> Result<Option<f32>> {
    if !accumulated.contains(destination) {
        return Err(Error::InvalidDestination(destination));
    }
    Ok(accumulated.cost_at(destination))
}

/// Cell sequence of the least-cost route, origin first.
///
/// Walks the back-links from the destination to the origin. `Ok(None)`
/// when the destination was never settled.
pub fn trace_route(
    accumulated: &AccumulatedCostSurface,
    destination: CellIndex,
) -> Result<Option<Vec<CellIndex>>> {
    if !accumulated.contains(destination) {
        return Err(Error::InvalidDestination(destination));
    }
    if !accumulated.is_settled(destination) {
        return Ok(None);
    }

    let mut route = vec![destination];
    let mut cell = destination;
    while let Some(previous) = accumulated.predecessor(cell) {
        route.push(previous);
        cell = previous;
    }
    route.reverse();
    Ok(Some(route))
}
