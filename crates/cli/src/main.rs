//! Command line support for cost-distance matrices.

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};

use costdist::{
    Connectivity, CsvTableSink, GridTransform, OverwritePolicy, TableSink,
    TraversalParamsBuilder, cost_distance_matrix, read_points,
};

#[derive(Parser)]
#[command(version, about, author, long_about = None)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Zarr store holding the cost raster.
    #[arg(short, long, value_name = "RASTER")]
    raster: PathBuf,

    /// Name of the cost layer within the store.
    #[arg(short, long, value_name = "LAYER")]
    layer: String,

    /// CSV of origin points (id,x,y).
    #[arg(long, value_name = "ORIGINS")]
    origins: PathBuf,

    /// CSV of destination points (id,x,y).
    #[arg(long, value_name = "DESTINATIONS")]
    destinations: PathBuf,

    /// Output table location.
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Neighborhood: 4 or 8.
    #[arg(long, default_value_t = 8)]
    connectivity: u8,

    /// Cell edge length in world units.
    #[arg(long = "cell-size", default_value_t = 1.0)]
    cell_size: f64,

    /// Western edge of the raster in world units.
    #[arg(long = "x-min", default_value_t = 0.0)]
    x_min: f64,

    /// Northern edge of the raster in world units.
    #[arg(long = "y-max")]
    y_max: f64,

    /// Replace the output table if it already exists.
    #[arg(long)]
    overwrite: bool,
}

fn main() {
    let cli = Cli::parse();

    let tracing_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .init();
    debug!("Verbose level: {}", cli.verbose);

    let connectivity = match cli.connectivity {
        4 => Connectivity::Four,
        8 => Connectivity::Eight,
        other => {
            eprintln!("connectivity must be 4 or 8, got {other}");
            std::process::exit(2);
        }
    };
    let params = TraversalParamsBuilder::default()
        .connectivity(connectivity)
        .build()
        .unwrap();
    let transform = GridTransform::new(cli.x_min, cli.y_max, cli.cell_size);

    let origins = read_points(&cli.origins).unwrap();
    let destinations = read_points(&cli.destinations).unwrap();
    info!(
        "Computing {} x {} pairs over layer '{}'",
        origins.len(),
        destinations.len(),
        cli.layer
    );

    let entries = cost_distance_matrix(
        &cli.raster,
        &cli.layer,
        transform,
        &origins,
        &destinations,
        params,
    )
    .unwrap();

    let overwrite = if cli.overwrite {
        OverwritePolicy::Overwrite
    } else {
        OverwritePolicy::ErrorIfExists
    };
    let mut sink = CsvTableSink::new(&cli.output, overwrite);
    sink.write(&entries).unwrap();

    println!("Wrote {} pairs to {:?}", entries.len(), cli.output);
}
