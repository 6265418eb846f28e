use geo::{Area, BooleanOps, Centroid, Geometry, MultiPolygon, Point};

use crate::error::{DiscretizeError, DiscretizeResult};

/// Name of a geometry variant, as reported in errors.
pub(crate) fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Accept a Polygon or MultiPolygon record as a MultiPolygon; any other type is rejected.
pub fn as_multipolygon(record: usize, geometry: &Geometry<f64>) -> DiscretizeResult<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon(vec![polygon.clone()])),
        Geometry::MultiPolygon(multi) => Ok(multi.clone()),
        other => Err(DiscretizeError::UnsupportedGeometryType {
            record,
            found: geometry_type_name(other),
        }),
    }
}

/// Exact intersection of two shapes; empty when they only touch or are disjoint.
#[inline]
pub fn intersection(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.intersection(b)
}

/// Planar area of a shape in squared CRS units.
#[inline]
pub fn area(shape: &MultiPolygon<f64>) -> f64 {
    shape.unsigned_area()
}

/// Centroid of a shape, `None` for empty shapes.
#[inline]
pub fn centroid(shape: &MultiPolygon<f64>) -> Option<Point<f64>> {
    shape.centroid()
}

#[cfg(test)]
mod tests {
    use geo::{line_string, point, polygon};

    use super::*;

    #[test]
    fn polygons_and_multipolygons_are_accepted() {
        let poly = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)];
        let multi = as_multipolygon(0, &Geometry::Polygon(poly.clone())).unwrap();
        assert_eq!(multi.0.len(), 1);

        let again = as_multipolygon(1, &Geometry::MultiPolygon(multi.clone())).unwrap();
        assert_eq!(again, multi);
    }

    #[test]
    fn other_geometry_types_are_rejected_with_record_index() {
        let err = as_multipolygon(3, &Geometry::Point(point!(x: 1.0, y: 2.0))).unwrap_err();
        assert!(matches!(err, DiscretizeError::UnsupportedGeometryType { record: 3, found: "Point" }));

        let err = as_multipolygon(0, &Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]))
            .unwrap_err();
        assert!(matches!(err, DiscretizeError::UnsupportedGeometryType { found: "LineString", .. }));
    }

    #[test]
    fn intersection_of_overlapping_squares() {
        let a = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)]]);
        let b = MultiPolygon(vec![polygon![(x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 3.0, y: 3.0), (x: 1.0, y: 3.0)]]);
        let piece = intersection(&a, &b);
        assert!((area(&piece) - 1.0).abs() < 1e-9);

        let c = centroid(&piece).unwrap();
        assert!((c.x() - 1.5).abs() < 1e-9 && (c.y() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn touching_squares_have_no_area_in_common() {
        let a = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)]]);
        let b = MultiPolygon(vec![polygon![(x: 1.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 1.0), (x: 1.0, y: 1.0)]]);
        assert!(area(&intersection(&a, &b)) < 1e-12);
    }
}
