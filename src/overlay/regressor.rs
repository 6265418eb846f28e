use geo::{Geometry, MultiPolygon};
use polars::prelude::*;

use crate::{
    error::{DiscretizeError, DiscretizeResult},
    geom::{self, reproject, Crs, Geometries},
};

/// Auxiliary geometries with one attribute row per geometry.
#[derive(Debug, Clone)]
pub struct Regressor {
    geoms: Geometries,
    data: DataFrame,
    crs: Crs,
}

impl Regressor {
    /// Regressor in lon/lat WGS84; `data` must have one row per shape.
    pub fn new(shapes: Vec<MultiPolygon<f64>>, data: DataFrame) -> DiscretizeResult<Self> {
        Self::with_crs(shapes, data, Crs::Wgs84)
    }

    pub fn with_crs(shapes: Vec<MultiPolygon<f64>>, data: DataFrame, crs: Crs) -> DiscretizeResult<Self> {
        if shapes.len() != data.height() {
            return Err(DiscretizeError::invalid("regressor",
                format!("{} geometries but {} attribute rows", shapes.len(), data.height())))
        }
        Ok(Self { geoms: Geometries::new(shapes), data, crs })
    }

    /// Regressor from raw records; anything but Polygon/MultiPolygon is rejected.
    pub fn from_records(records: &[Geometry<f64>], data: DataFrame, crs: Crs) -> DiscretizeResult<Self> {
        let shapes = records.iter().enumerate()
            .map(|(i, record)| geom::as_multipolygon(i, record))
            .collect::<DiscretizeResult<Vec<_>>>()?;
        Self::with_crs(shapes, data, crs)
    }

    #[inline] pub fn len(&self) -> usize { self.geoms.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.geoms.is_empty() }

    #[inline] pub fn geometries(&self) -> &[MultiPolygon<f64>] { self.geoms.shapes() }

    #[inline] pub(crate) fn geoms(&self) -> &Geometries { &self.geoms }

    #[inline] pub fn data(&self) -> &DataFrame { &self.data }

    #[inline] pub fn crs(&self) -> &Crs { &self.crs }

    /// Reproject the geometries to lon/lat WGS84.
    pub fn to_wgs84(&self) -> DiscretizeResult<Self> {
        if self.crs.is_wgs84() { return Ok(self.clone()) }
        let shapes = reproject(self.geoms.shapes(), &self.crs, &Crs::Wgs84)?;
        Self::new(shapes, self.data.clone())
    }
}
