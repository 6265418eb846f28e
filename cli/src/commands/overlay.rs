use anyhow::Result;
use discretbox::{io, overlay_regressor};

use super::{crs_for, driver_for, report};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::OverlayArgs) -> Result<()> {
    let input_driver = driver_for(&args.table, args.driver)?;
    let output_driver = driver_for(&args.output, args.driver)?;

    let table = io::load_discretization(&args.table, input_driver)?;
    let regressor = io::read_regressor(&args.regressor, crs_for(args.source_epsg))?;

    let outcome = overlay_regressor(&table, &regressor, args.policy, &args.id_column, args.columns.as_deref())?;
    io::save_discretization(&outcome.value, &args.output, output_driver, args.force)?;

    let added = outcome.value.data().width().saturating_sub(table.data().width());
    println!("[overlay] {} policy, {added} new column(s) -> {}", args.policy, args.output.display());
    report(&outcome.warnings);
    Ok(())
}
