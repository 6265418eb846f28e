mod bbox;
mod crs;
mod geom;
mod ops;

pub use crs::{reproject, Crs};
pub(crate) use geom::Geometries;
pub(crate) use ops::geometry_type_name;
pub use ops::{area, as_multipolygon, centroid, intersection};
