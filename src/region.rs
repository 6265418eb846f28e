use geo::{Geometry, MultiPolygon, Polygon};

use crate::{error::DiscretizeResult, geom::{self, reproject, Crs, Geometries}};

/// The study region to discretize: an ordered list of record geometries in one CRS.
#[derive(Debug, Clone)]
pub struct Region {
    records: Vec<Geometry<f64>>,
    crs: Crs,
}

impl Region {
    /// Region from records in lon/lat WGS84.
    pub fn new(records: Vec<Geometry<f64>>) -> Self {
        Self { records, crs: Crs::Wgs84 }
    }

    /// Region from records in an arbitrary CRS.
    pub fn with_crs(records: Vec<Geometry<f64>>, crs: Crs) -> Self {
        Self { records, crs }
    }

    /// Single-polygon region in lon/lat WGS84.
    pub fn from_polygon(polygon: Polygon<f64>) -> Self {
        Self::new(vec![Geometry::Polygon(polygon)])
    }

    #[inline] pub fn records(&self) -> &[Geometry<f64>] { &self.records }

    #[inline] pub fn crs(&self) -> &Crs { &self.crs }

    #[inline] pub fn len(&self) -> usize { self.records.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Every record as a MultiPolygon; the first non-areal record aborts with its index.
    pub fn multipolygons(&self) -> DiscretizeResult<Vec<MultiPolygon<f64>>> {
        self.records.iter().enumerate()
            .map(|(i, record)| geom::as_multipolygon(i, record))
            .collect()
    }

    /// Flatten all records into their constituent polygons.
    /// Which record a polygon came from is not retained.
    pub fn polygons(&self) -> DiscretizeResult<Vec<Polygon<f64>>> {
        Ok(self.multipolygons()?.into_iter()
            .flat_map(|multi| multi.0)
            .collect())
    }

    /// Union of all records, used to clip tessellations to the region outline.
    pub fn union(&self) -> DiscretizeResult<MultiPolygon<f64>> {
        Ok(Geometries::new(self.multipolygons()?).union()
            .unwrap_or_else(|| MultiPolygon(vec![])))
    }

    /// Reproject the region to lon/lat WGS84, the frame both tessellations work in.
    pub fn to_wgs84(&self) -> DiscretizeResult<Self> {
        if self.crs.is_wgs84() { return Ok(self.clone()) }
        let shapes = reproject(&self.multipolygons()?, &self.crs, &Crs::Wgs84)?;
        Ok(Self::new(shapes.into_iter().map(Geometry::MultiPolygon).collect()))
    }
}

#[cfg(test)]
mod tests {
    use geo::{point, polygon, Area};

    use super::*;
    use crate::error::DiscretizeError;

    fn unit_square(x: f64) -> Polygon<f64> {
        polygon![(x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0)]
    }

    #[test]
    fn multipolygon_records_are_flattened() {
        let region = Region::new(vec![
            Geometry::MultiPolygon(MultiPolygon(vec![unit_square(0.0), unit_square(3.0)])),
            Geometry::Polygon(unit_square(6.0)),
        ]);
        assert_eq!(region.polygons().unwrap().len(), 3);
    }

    #[test]
    fn point_record_is_unsupported() {
        let region = Region::new(vec![
            Geometry::Polygon(unit_square(0.0)),
            Geometry::Point(point!(x: 0.5, y: 0.5)),
        ]);
        let err = region.polygons().unwrap_err();
        assert!(matches!(err, DiscretizeError::UnsupportedGeometryType { record: 1, found: "Point" }));
    }

    #[test]
    fn union_merges_adjacent_records() {
        let region = Region::new(vec![
            Geometry::Polygon(unit_square(0.0)),
            Geometry::Polygon(unit_square(1.0)),
        ]);
        assert!((region.union().unwrap().unsigned_area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn wgs84_region_is_returned_unchanged() {
        let region = Region::from_polygon(unit_square(0.0));
        let same = region.to_wgs84().unwrap();
        assert_eq!(same.records(), region.records());
    }
}
