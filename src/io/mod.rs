//! Reading regions and regressors, writing and reading discretizations.

mod csv;
mod fs;
mod geojson;
mod shp;
pub mod wkb;

use std::{fmt, path::Path, str::FromStr};

use anyhow::{bail, Context, Result};
use geo::Geometry;
use polars::prelude::*;

use crate::{
    discretization::{from_export_friendly, to_export_friendly, Discretization, GEOMETRY},
    geom::{as_multipolygon, Crs},
    overlay::Regressor,
    region::Region,
};

pub use csv::{read_matrix_csv, write_matrix_csv};

/// File format of a stored discretization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    GeoJson,
    Csv,
}

impl Driver {
    /// Driver implied by the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("geojson" | "json") => Ok(Driver::GeoJson),
            Some("csv") => Ok(Driver::Csv),
            _ => bail!("[io] cannot infer a driver from {}; use .geojson or .csv", path.display()),
        }
    }
}

impl FromStr for Driver {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "geojson" | "json" => Ok(Driver::GeoJson),
            "csv" => Ok(Driver::Csv),
            other => bail!("unknown driver {other:?} (expected geojson or csv)"),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::GeoJson => write!(f, "geojson"),
            Driver::Csv => write!(f, "csv"),
        }
    }
}

/// Geometries and attributes from a `.geojson`/`.json` or `.shp` file.
fn read_layer(path: &Path) -> Result<(Vec<Geometry<f64>>, DataFrame)> {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("shp") => shp::read_shapefile(path),
        Some("geojson" | "json") => {
            let bytes = std::fs::read(path).with_context(|| format!("[io] read {}", path.display()))?;
            geojson::read_features(&bytes).with_context(|| format!("[io] parse {}", path.display()))
        }
        _ => bail!("[io] unsupported layer format: {}", path.display()),
    }
}

/// Read a study region; coordinates are taken to be in `crs`.
pub fn read_region(path: &Path, crs: Crs) -> Result<Region> {
    let (records, _) = read_layer(path)?;
    log::info!("region: {} records from {} ({crs})", records.len(), path.display());
    Ok(Region::with_crs(records, crs))
}

/// Read a regressor layer; coordinates are taken to be in `crs`.
pub fn read_regressor(path: &Path, crs: Crs) -> Result<Regressor> {
    let (records, data) = read_layer(path)?;
    let data = match data.column(GEOMETRY) {
        Ok(_) => data.drop(GEOMETRY)?,
        Err(_) => data,
    };
    log::info!("regressor: {} records, {} attribute columns from {}", records.len(), data.width(), path.display());
    Ok(Regressor::from_records(&records, data, crs)?)
}

/// Write a discretization; the neighbor lists are encoded as `-`-joined text.
pub fn save_discretization(discretization: &Discretization, path: &Path, driver: Driver, force: bool) -> Result<()> {
    let bytes = match driver {
        Driver::GeoJson => geojson::write_discretization(discretization)?,
        Driver::Csv => csv::write_table_bytes(&mut to_export_friendly(discretization)?)?,
    };
    fs::write_atomic(path, &bytes, force)?;
    log::info!("wrote {} cells to {} ({driver})", discretization.len(), path.display());
    Ok(())
}

/// Read a discretization written by [`save_discretization`].
pub fn load_discretization(path: &Path, driver: Driver) -> Result<Discretization> {
    let bytes = std::fs::read(path).with_context(|| format!("[io] read {}", path.display()))?;
    let frame = match driver {
        Driver::Csv => csv::read_table(&bytes)?,
        Driver::GeoJson => {
            let (records, data) = geojson::read_features(&bytes)?;
            let hex = records.iter().enumerate()
                .map(|(i, record)| Ok(wkb::multipolygon_to_hex_wkb(&as_multipolygon(i, record)?)))
                .collect::<Result<Vec<_>>>()?;
            let mut frame = data;
            frame.with_column(Column::new(GEOMETRY.into(), hex))?;
            frame
        }
    };
    from_export_friendly(&frame).with_context(|| format!("[io] rebuild discretization from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_from_extension() {
        assert_eq!(Driver::from_path(Path::new("cells.GeoJSON")).unwrap(), Driver::GeoJson);
        assert_eq!(Driver::from_path(Path::new("out/cells.csv")).unwrap(), Driver::Csv);
        assert!(Driver::from_path(Path::new("cells.parquet")).is_err());
        assert_eq!("CSV".parse::<Driver>().unwrap(), Driver::Csv);
    }

    #[test]
    fn region_from_geojson_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.geojson");
        std::fs::write(&path, r#"{ "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] }"#).unwrap();
        let region = read_region(&path, Crs::Wgs84).unwrap();
        assert_eq!(region.len(), 1);
    }

    #[test]
    fn point_regressor_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stops.geojson");
        std::fs::write(&path, r#"{ "type": "Feature", "geometry": { "type": "Point", "coordinates": [0, 0] },
            "properties": { "riders": 3 } }"#).unwrap();
        assert!(read_regressor(&path, Crs::Wgs84).is_err());
    }
}
