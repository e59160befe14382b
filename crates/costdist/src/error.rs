//! Possible errors

use crate::CellIndex;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    ZarrsArray(#[from] zarrs::array::ArrayError),

    #[error(transparent)]
    ZarrsArrayCreate(#[from] zarrs::array::ArrayCreateError),

    #[error(transparent)]
    ZarrsStorage(#[from] zarrs::storage::StorageError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Origin cell outside the raster or on an impassable cell.
    #[error("origin cell {0} is outside the raster or impassable")]
    InvalidOrigin(CellIndex),

    /// Destination cell outside the raster.
    #[error("destination cell {0} is outside the raster")]
    InvalidDestination(CellIndex),

    /// The raster is larger than a single sweep is allowed to allocate for.
    #[error("raster has {cells} cells, exceeding the solve budget of {budget}")]
    SolveBudgetExceeded { cells: usize, budget: usize },

    /// Output table present and the overwrite policy forbids replacing it.
    #[error("output table {0:?} already exists and overwrite is disabled")]
    OutputExists(std::path::PathBuf),
}

pub type Result<T> = core::result::Result<T, Error>;
