use std::io::Write;

use ndarray::Array2;

use costdist::{
    Connectivity, CsvTableSink, GridTransform, OverwritePolicy, PathCost, Point, TableSink,
    TraversalParamsBuilder, cost_distance_matrix, read_points,
};

/// Build a 4x4 cost store with an L-shaped wall of no-data.
///
/// ```text
///  1 nan  1  1
///  1 nan  1  1
///  1 nan nan  1
///  1   1  1   1
/// ```
fn walled_cost_store() -> tempfile::TempDir {
    let (ni, nj) = (4, 4);
    let (ci, cj) = (2, 2);

    let store_path = tempfile::TempDir::new().unwrap();

    let store: zarrs::storage::ReadableWritableListableStorage = std::sync::Arc::new(
        zarrs::filesystem::FilesystemStore::new(store_path.path())
            .expect("could not open filesystem store"),
    );

    zarrs::group::GroupBuilder::new()
        .build(store.clone(), "/")
        .unwrap()
        .store_metadata()
        .unwrap();

    let array = zarrs::array::ArrayBuilder::new(
        vec![ni, nj], // array shape
        zarrs::array::DataType::Float32,
        vec![ci, cj].try_into().unwrap(), // regular chunk grid
        zarrs::array::FillValue::from(zarrs::array::ZARR_NAN_F32),
    )
    .dimension_names(["y", "x"].into())
    .build(store.clone(), "/slope")
    .unwrap();

    array.store_metadata().unwrap();

    let nan = f32::NAN;
    #[rustfmt::skip]
    let a = vec![1., nan,  1.,  1.,
                 1., nan,  1.,  1.,
                 1., nan, nan,  1.,
                 1.,  1.,  1.,  1.];

    let data: Array2<f32> =
        ndarray::Array::from_shape_vec((ni.try_into().unwrap(), nj.try_into().unwrap()), a)
            .unwrap();

    array
        .store_chunks_ndarray(
            &zarrs::array_subset::ArraySubset::new_with_ranges(&[0..(ni / ci), 0..(nj / cj)]),
            data,
        )
        .unwrap();

    store_path
}

#[test]
fn matrix_around_a_wall_through_the_sink() {
    let store = walled_cost_store();
    // Unit cells, northern edge at y = 4.
    let transform = GridTransform::new(0.0, 4.0, 1.0);
    let params = TraversalParamsBuilder::default()
        .connectivity(Connectivity::Four)
        .build()
        .unwrap();

    // Origin in the northwest corner, cell (0, 0).
    let origins = vec![Point::new(1, 0.5, 3.5)];
    // One destination across the wall at cell (0, 2), one outside the
    // raster, one next to the origin at cell (1, 0).
    let destinations = vec![
        Point::new(10, 2.5, 3.5),
        Point::new(11, -9.0, 3.5),
        Point::new(12, 0.5, 2.5),
    ];

    let entries = cost_distance_matrix(
        store.path(),
        "slope",
        transform,
        &origins,
        &destinations,
        params,
    )
    .unwrap();

    assert_eq!(entries.len(), 3);
    // Around the wall: down the west column, across the south row, back up
    // the east side. 10 orthogonal steps at unit cost.
    assert_eq!(entries[0].cost, PathCost::Cost(10.0));
    assert_eq!(entries[1].cost, PathCost::InvalidDestination);
    assert_eq!(entries[2].cost, PathCost::Cost(1.0));

    let out_dir = tempfile::TempDir::new().unwrap();
    let out_path = out_dir.path().join("matrix.csv");
    let mut sink = CsvTableSink::new(&out_path, OverwritePolicy::Overwrite);
    sink.write(&entries).unwrap();

    let content = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "origin_id,destination_id,cost");
    assert_eq!(lines[1], "1,10,10.0");
    assert_eq!(lines[2], "1,11,");
    assert_eq!(lines[3], "1,12,1.0");
}

#[test]
fn points_csv_to_matrix() {
    let store = walled_cost_store();
    let transform = GridTransform::new(0.0, 4.0, 1.0);

    let mut origins_csv = tempfile::NamedTempFile::new().unwrap();
    origins_csv
        .write_all(b"id,x,y\n1,0.5,3.5\n2,3.5,3.5\n")
        .unwrap();
    origins_csv.flush().unwrap();

    let mut destinations_csv = tempfile::NamedTempFile::new().unwrap();
    destinations_csv
        .write_all(b"id,x,y\n10,0.5,0.5\n11,3.5,0.5\n")
        .unwrap();
    destinations_csv.flush().unwrap();

    let origins = read_points(origins_csv.path()).unwrap();
    let destinations = read_points(destinations_csv.path()).unwrap();

    let entries = cost_distance_matrix(
        store.path(),
        "slope",
        transform,
        &origins,
        &destinations,
        TraversalParamsBuilder::default().build().unwrap(),
    )
    .unwrap();

    // 2 x 2 pairs, origins outer, destinations inner.
    assert_eq!(entries.len(), 4);
    let ids: Vec<(i64, i64)> = entries
        .iter()
        .map(|e| (e.origin_id, e.destination_id))
        .collect();
    assert_eq!(ids, vec![(1, 10), (1, 11), (2, 10), (2, 11)]);
    assert!(entries.iter().all(|e| e.cost.as_cost().is_some()));
}
