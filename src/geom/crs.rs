use std::fmt;

use geo::{Coord, MapCoords, MultiPolygon};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::error::{DiscretizeError, DiscretizeResult};

/// Coordinate reference system of a geometry collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Crs {
    /// Geographic lon/lat on WGS84 (EPSG:4326), the frame every discretization uses.
    #[default]
    Wgs84,
    /// A registered EPSG code with a known PROJ.4 definition.
    Epsg(u32),
    /// An explicit PROJ.4 definition.
    Proj4(String),
}

impl Crs {
    /// PROJ.4 definition for this CRS.
    pub fn proj4(&self) -> DiscretizeResult<String> {
        match self {
            Crs::Wgs84 => Ok(WGS84.to_string()),
            Crs::Proj4(def) => Ok(def.clone()),
            Crs::Epsg(code) => epsg_to_proj4(*code)
                .ok_or_else(|| DiscretizeError::invalid("crs", format!("unknown EPSG code {code}"))),
        }
    }

    /// True when coordinates are lon/lat degrees (proj4rs works in radians for these).
    pub fn is_geographic(&self) -> bool {
        match self {
            Crs::Wgs84 => true,
            Crs::Epsg(code) => matches!(code, 4326 | 4269 | 4674 | 4618),
            Crs::Proj4(def) => def.contains("+proj=longlat"),
        }
    }

    #[inline] pub fn is_wgs84(&self) -> bool { matches!(self, Crs::Wgs84 | Crs::Epsg(4326)) }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Wgs84 => write!(f, "EPSG:4326"),
            Crs::Epsg(code) => write!(f, "EPSG:{code}"),
            Crs::Proj4(def) => write!(f, "{def}"),
        }
    }
}

const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// PROJ.4 string for the EPSG codes a discretization run typically meets.
fn epsg_to_proj4(code: u32) -> Option<String> {
    let def = match code {
        4326 => WGS84.to_string(),
        4269 => "+proj=longlat +datum=NAD83 +no_defs +type=crs".to_string(),
        // SIRGAS 2000 / SAD69 geographic
        4674 => "+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs +type=crs".to_string(),
        4618 => "+proj=longlat +a=6378160 +rf=298.25 +towgs84=-57,1,-41,0,0,0,0 +no_defs +type=crs".to_string(),
        3857 => "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs +type=crs".to_string(),
        // WGS84 / UTM north and south
        32601..=32660 => format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs +type=crs", code - 32600),
        32701..=32760 => format!("+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs +type=crs", code - 32700),
        // SIRGAS 2000 / UTM zones 11N..22N and 17S..25S
        31965..=31976 => format!(
            "+proj=utm +zone={} +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs", code - 31954),
        31977..=31985 => format!(
            "+proj=utm +zone={} +south +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs", code - 31960),
        // SAD69 / UTM zones 18S..25S
        29178..=29185 => format!(
            "+proj=utm +zone={} +south +a=6378160 +rf=298.25 +towgs84=-57,1,-41,0,0,0,0 +units=m +no_defs +type=crs",
            code - 29160),
        _ => return None,
    };
    Some(def)
}

/// Reproject shapes between two coordinate reference systems.
pub fn reproject(shapes: &[MultiPolygon<f64>], from: &Crs, to: &Crs) -> DiscretizeResult<Vec<MultiPolygon<f64>>> {
    if from == to { return Ok(shapes.to_vec()) }

    let build = |crs: &Crs| -> DiscretizeResult<Proj4> {
        let def = crs.proj4()?;
        Proj4::from_proj_string(&def)
            .map_err(|e| DiscretizeError::invalid("crs", format!("failed to build PROJ.4 `{def}`: {e:?}")))
    };
    let (src, dst) = (build(from)?, build(to)?);
    let (src_geographic, dst_geographic) = (from.is_geographic(), to.is_geographic());

    shapes.iter()
        .map(|shape| shape.try_map_coords(|coord: Coord<f64>| {
            let mut point = if src_geographic {
                (coord.x.to_radians(), coord.y.to_radians(), 0.0)
            } else {
                (coord.x, coord.y, 0.0)
            };
            transform(&src, &dst, &mut point)
                .map_err(|e| DiscretizeError::invalid("crs", format!("transform from {from} to {to} failed: {e:?}")))?;
            Ok(if dst_geographic {
                Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
            } else {
                Coord { x: point.0, y: point.1 }
            })
        }))
        .collect()
}
