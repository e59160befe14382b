//! Ordered point sets from delimited text.

use std::path::Path;

use tracing::debug;

use crate::Result;
use crate::matrix::Point;

/// Read an ordered point set from a CSV of `id,x,y` records.
///
/// Input order is preserved; it becomes the matrix row or column order.
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Vec<Point>> {
    debug!("Reading points from {:?}", path.as_ref());
    let mut reader = csv::Reader::from_path(path)?;
    let mut points = Vec::new();
    for record in reader.deserialize() {
        points.push(record?);
    }
    debug!("Read {} points", points.len());
    Ok(points)
}
