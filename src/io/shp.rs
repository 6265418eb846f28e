use std::{collections::{BTreeMap, HashMap}, path::Path};

use anyhow::{bail, Context, Result};
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use polars::prelude::*;
use shapefile::{dbase::{FieldValue, Record}, Reader, Shape};

/// Signed shoelace area of a closed ring; shapefile exteriors are clockwise (negative).
fn signed_area(ring: &[Coord<f64>]) -> f64 {
    ring.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
}

/// Group shapefile rings into polygons: every clockwise ring opens a polygon
/// and the counter-clockwise rings after it are its holes.
fn rings_to_multipolygon(rings: impl IntoIterator<Item = Vec<Coord<f64>>>) -> MultiPolygon<f64> {
    let mut polygons = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes = Vec::new();

    for mut coords in rings {
        if coords.first() != coords.last() {
            if let Some(&first) = coords.first() { coords.push(first) }
        }
        let is_exterior = signed_area(&coords) < 0.0;
        let ring = LineString(coords);
        if is_exterior {
            if let Some(ext) = exterior.take() {
                polygons.push(Polygon::new(ext, std::mem::take(&mut holes)));
            }
            exterior = Some(ring);
        } else {
            holes.push(ring);
        }
    }
    if let Some(ext) = exterior {
        polygons.push(Polygon::new(ext, holes));
    }
    MultiPolygon(polygons)
}

/// Convert one shape; points and lines come through so the caller can reject
/// them with a typed error.
fn shape_to_geometry(shape: Shape) -> Result<Geometry<f64>> {
    let xy = |x: f64, y: f64| Coord { x, y };
    Ok(match shape {
        Shape::Polygon(p) => Geometry::MultiPolygon(rings_to_multipolygon(
            p.rings().iter().map(|r| r.points().iter().map(|pt| xy(pt.x, pt.y)).collect()))),
        Shape::PolygonM(p) => Geometry::MultiPolygon(rings_to_multipolygon(
            p.rings().iter().map(|r| r.points().iter().map(|pt| xy(pt.x, pt.y)).collect()))),
        Shape::PolygonZ(p) => Geometry::MultiPolygon(rings_to_multipolygon(
            p.rings().iter().map(|r| r.points().iter().map(|pt| xy(pt.x, pt.y)).collect()))),
        Shape::Point(p) => Geometry::Point(Point::new(p.x, p.y)),
        Shape::Multipoint(m) => Geometry::MultiPoint(MultiPoint(
            m.points().iter().map(|p| Point::new(p.x, p.y)).collect())),
        Shape::Polyline(l) => Geometry::MultiLineString(MultiLineString(
            l.parts().iter().map(|part| LineString(part.iter().map(|p| xy(p.x, p.y)).collect())).collect())),
        Shape::NullShape => bail!("null shape"),
        other => bail!("unsupported shape type {:?}", other.shapetype()),
    })
}

/// One attribute column, typed from the dBase values present.
fn field_column(name: &str, values: &[Option<FieldValue>]) -> Column {
    let number = |v: &FieldValue| match v {
        FieldValue::Numeric(n) => Some(*n),
        FieldValue::Float(f) => Some(f.map(f64::from)),
        FieldValue::Double(d) => Some(Some(*d)),
        FieldValue::Integer(i) => Some(Some(f64::from(*i))),
        FieldValue::Currency(c) => Some(Some(*c)),
        _ => None,
    };
    let present = values.iter().flatten().collect::<Vec<_>>();

    if !present.is_empty() && present.iter().all(|v| number(v).is_some()) {
        Column::new(name.into(), values.iter()
            .map(|v| v.as_ref().and_then(number).flatten())
            .collect::<Vec<Option<f64>>>())
    } else if !present.is_empty() && present.iter().all(|v| matches!(v, FieldValue::Logical(_))) {
        Column::new(name.into(), values.iter()
            .map(|v| match v { Some(FieldValue::Logical(b)) => *b, _ => None })
            .collect::<Vec<Option<bool>>>())
    } else {
        Column::new(name.into(), values.iter()
            .map(|v| match v {
                Some(FieldValue::Character(s)) => s.as_ref().map(|s| s.trim().to_string()),
                Some(FieldValue::Memo(s)) => Some(s.trim().to_string()),
                Some(other) => Some(format!("{other:?}")),
                None => None,
            })
            .collect::<Vec<Option<String>>>())
    }
}

/// dBase records as a table; columns are ordered by field name.
fn records_to_dataframe(records: Vec<Record>) -> Result<DataFrame> {
    let height = records.len();
    let maps = records.into_iter().map(HashMap::<String, FieldValue>::from).collect::<Vec<_>>();

    let mut fields = BTreeMap::<String, Vec<Option<FieldValue>>>::new();
    for (row, map) in maps.into_iter().enumerate() {
        for (name, value) in map {
            fields.entry(name).or_insert_with(|| vec![None; height])[row] = Some(value);
        }
    }
    if fields.is_empty() { return Ok(DataFrame::empty_with_height(height)) }

    let columns = fields.iter().map(|(name, values)| field_column(name, values)).collect();
    Ok(DataFrame::new(columns)?)
}

/// Read every shape of a `.shp` file with its dBase attributes.
pub(crate) fn read_shapefile(path: &Path) -> Result<(Vec<Geometry<f64>>, DataFrame)> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp] failed to open shapefile: {}", path.display()))?;

    let mut geometries = Vec::new();
    let mut records = Vec::new();
    for (i, item) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = item.with_context(|| format!("[io::shp] record {i} of {}", path.display()))?;
        geometries.push(shape_to_geometry(shape).with_context(|| format!("[io::shp] record {i}"))?);
        records.push(record);
    }
    log::debug!("read {} shapes from {}", geometries.len(), path.display());
    Ok((geometries, records_to_dataframe(records)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn clockwise_rings_open_polygons_and_holes_follow() {
        let outer = ring(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
        let hole = ring(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)]);
        let island = ring(&[(10.0, 10.0), (10.0, 11.0), (11.0, 11.0), (11.0, 10.0)]);

        let shape = rings_to_multipolygon([outer, hole, island]);
        assert_eq!(shape.0.len(), 2);
        assert_eq!(shape.0[0].interiors().len(), 1);
        assert!(shape.0[1].interiors().is_empty());
        assert!(shape.0[0].exterior().is_closed());
    }

    #[test]
    fn numeric_and_text_fields_are_typed() {
        let values = vec![Some(FieldValue::Numeric(Some(3.0))), None, Some(FieldValue::Integer(4))];
        let column = field_column("pop", &values);
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.null_count(), 1);

        let values = vec![Some(FieldValue::Character(Some(" Lapa ".into()))), Some(FieldValue::Character(None))];
        let column = field_column("bairro", &values);
        assert_eq!(column.str().unwrap().get(0), Some("Lapa"));
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_shapefile(&dir.path().join("nothing.shp")).is_err());
    }
}
