pub mod discretize;
pub mod overlay;
pub mod travel_times;

use std::path::Path;

use anyhow::Result;
use discretbox::{io::Driver, Crs, Warning};

/// Explicit driver, or the one implied by the file extension.
fn driver_for(path: &Path, driver: Option<Driver>) -> Result<Driver> {
    match driver {
        Some(driver) => Ok(driver),
        None => Driver::from_path(path),
    }
}

fn crs_for(epsg: Option<u32>) -> Crs {
    epsg.map_or(Crs::Wgs84, Crs::Epsg)
}

fn report(warnings: &[Warning]) {
    if !warnings.is_empty() {
        eprintln!("{} warning(s); rerun with -v for details", warnings.len());
    }
}
