use anyhow::{bail, Context, Result};
use discretbox::{
    io,
    travel::{read_points_file, travel_time_matrix},
    build_travel_time_matrix, GraphHopperClient, RoutingConfig,
};

use crate::cli::BatchingMode;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::TravelTimesArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => RoutingConfig::load(path)?,
        None => RoutingConfig::default(),
    }
    .with_env_api_key();
    let client = GraphHopperClient::new(&config)?;
    let batching = config.batching(args.batching == BatchingMode::Split);

    let (ids, times) = match (&args.table, &args.points) {
        (_, Some(points)) => {
            let points = read_points_file(points)?;
            let ids = (0..points.len()).map(|i| i.to_string()).collect::<Vec<_>>();
            (ids, travel_time_matrix(&points, &client, batching)?)
        }
        (Some(table), None) => {
            let table = io::load_discretization(table, io::Driver::from_path(table)?)?;
            (table.ids().to_vec(), build_travel_time_matrix(&table, &client, batching)?)
        }
        (None, None) => bail!("[travel-times] provide a discretization or --points"),
    };

    io::write_matrix_csv(&times, &ids, &args.output, args.force)
        .with_context(|| format!("[travel-times] write {}", args.output.display()))?;
    println!("[travel-times] {}×{} matrix -> {}", times.nrows(), times.ncols(), args.output.display());
    Ok(())
}
