use anyhow::Result;
use discretbox::{generate_discretization, io, ShapeKind, ShapeSpec};

use super::{crs_for, driver_for, report};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::DiscretizeArgs) -> Result<()> {
    let driver = driver_for(&args.output, args.driver)?;
    let shape = match args.shape {
        ShapeKind::Hexagon => ShapeSpec::Hexagon { resolution: args.resolution, containment: args.containment },
        ShapeKind::Rectangle => ShapeSpec::Rectangle { nx: args.nx, ny: args.ny, neighborhood: args.neighborhood },
    };

    let region = io::read_region(&args.region, crs_for(args.source_epsg))?;
    let outcome = generate_discretization(&region, &shape)?;
    io::save_discretization(&outcome.value, &args.output, driver, args.force)?;

    println!("[discretize] {} cells -> {}", outcome.value.len(), args.output.display());
    report(&outcome.warnings);
    Ok(())
}
