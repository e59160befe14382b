//! Output-table persistence.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::matrix::PathCostEntry;
use crate::{Error, Result};

/// What to do when the output location already exists.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OverwritePolicy {
    /// Replace an existing table.
    #[default]
    Overwrite,
    /// Refuse to touch an existing table.
    ErrorIfExists,
}

/// Consumes the assembled matrix and persists it as a table.
pub trait TableSink {
    /// Persist all entries; called once with the complete matrix.
    fn write(&mut self, entries: &[PathCostEntry]) -> Result<()>;
}

#[derive(Serialize)]
struct CsvRecord {
    origin_id: i64,
    destination_id: i64,
    cost: Option<f32>,
}

/// CSV-backed [`TableSink`].
///
/// Three columns: origin id, destination id, and accumulated cost. The
/// cost field is left empty for pairings without a numeric cost, so an
/// unreachable pair can never be mistaken for a real value.
#[derive(Debug)]
pub struct CsvTableSink {
    path: PathBuf,
    overwrite: OverwritePolicy,
}

impl CsvTableSink {
    #[allow(missing_docs)]
    pub fn new<P: AsRef<Path>>(path: P, overwrite: OverwritePolicy) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            overwrite,
        }
    }
}

impl TableSink for CsvTableSink {
    fn write(&mut self, entries: &[PathCostEntry]) -> Result<()> {
        if self.overwrite == OverwritePolicy::ErrorIfExists && self.path.exists() {
            return Err(Error::OutputExists(self.path.clone()));
        }
        debug!("Writing {} entries to {:?}", entries.len(), self.path);

        let mut writer = csv::Writer::from_path(&self.path)?;
        for entry in entries {
            writer.serialize(CsvRecord {
                origin_id: entry.origin_id,
                destination_id: entry.destination_id,
                cost: entry.cost.as_cost(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}
