//! Cost-layer access from Zarr stores.
//!
//! The raster provider reads one named layer into memory as `f32`,
//! whatever numeric dtype the store carries, and maps the store's
//! fill/no-data values to the impassable sentinel.

use std::path::Path;
use std::sync::Arc;

use ndarray::{ArrayD, Ix2};
use tracing::{debug, trace};

use zarrs::array::{Array, DataType, ElementOwned};
use zarrs::array_subset::ArraySubset;
use zarrs::storage::{ReadableListableStorage, ReadableListableStorageTraits};

use crate::surface::{GridTransform, RasterCostSurface};
use crate::{Error, Result};

/// Open `store_path` and read the layer named `layer` as a cost surface.
///
/// The layer must be a 2D array; negative and non-finite values become
/// impassable cells.
pub fn load_cost_layer<P: AsRef<Path>>(
    store_path: P,
    layer: &str,
    transform: GridTransform,
) -> Result<RasterCostSurface> {
    debug!("Opening cost store: {:?}", store_path.as_ref());
    let store: ReadableListableStorage = Arc::new(
        zarrs::filesystem::FilesystemStore::new(store_path)
            .map_err(|err| Error::IO(std::io::Error::other(err)))?,
    );

    let array = Array::open(store, &format!("/{layer}")).map_err(|err| {
        Error::IO(std::io::Error::other(format!(
            "Failed to open layer '{layer}': {err}"
        )))
    })?;

    let shape = array.shape();
    if shape.len() != 2 {
        return Err(Error::IO(std::io::Error::other(format!(
            "Layer '{layer}' has {} dimensions, expected 2",
            shape.len()
        ))));
    }
    trace!("Layer '{layer}' shape: {shape:?}");

    let subset = ArraySubset::new_with_ranges(&[0..shape[0], 0..shape[1]]);
    let values = load_as_f32(&array, layer, &subset)?;
    let values = values.into_dimensionality::<Ix2>().map_err(|err| {
        Error::IO(std::io::Error::other(format!(
            "Layer '{layer}' is not a 2D grid: {err}"
        )))
    })?;

    Ok(RasterCostSurface::new(values, transform))
}

fn load_as_f32<TStorage>(
    array: &Array<TStorage>,
    layer: &str,
    subset: &ArraySubset,
) -> Result<ArrayD<f32>>
where
    TStorage: ?Sized + ReadableListableStorageTraits + 'static,
{
    match array.data_type() {
        DataType::Float32 => retrieve_and_convert::<f32, TStorage, _>(array, subset, |v| v),
        DataType::Float64 => {
            retrieve_and_convert::<f64, TStorage, _>(array, subset, |v| v as f32)
        }
        DataType::Int8 => retrieve_and_convert::<i8, TStorage, _>(array, subset, |v| v as f32),
        DataType::Int16 => retrieve_and_convert::<i16, TStorage, _>(array, subset, |v| v as f32),
        DataType::Int32 => retrieve_and_convert::<i32, TStorage, _>(array, subset, |v| v as f32),
        DataType::Int64 => retrieve_and_convert::<i64, TStorage, _>(array, subset, |v| v as f32),
        DataType::UInt8 => retrieve_and_convert::<u8, TStorage, _>(array, subset, |v| v as f32),
        DataType::UInt16 => retrieve_and_convert::<u16, TStorage, _>(array, subset, |v| v as f32),
        DataType::UInt32 => retrieve_and_convert::<u32, TStorage, _>(array, subset, |v| v as f32),
        DataType::UInt64 => retrieve_and_convert::<u64, TStorage, _>(array, subset, |v| v as f32),
        other => Err(Error::IO(std::io::Error::other(format!(
            "Unsupported data type {other:?} for layer '{layer}'"
        )))),
    }
}

fn retrieve_and_convert<T, TStorage, F>(
    array: &Array<TStorage>,
    subset: &ArraySubset,
    converter: F,
) -> Result<ArrayD<f32>>
where
    T: ElementOwned + Clone,
    TStorage: ?Sized + ReadableListableStorageTraits + 'static,
    F: Fn(T) -> f32 + Copy,
{
    let raw = array.retrieve_array_subset_ndarray::<T>(subset)?;
    Ok(raw.mapv(converter))
}
