use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use polars::prelude::*;
use serde_json::{json, Map, Value};

use crate::discretization::{encode_neighbors, Discretization, NEIGHBORS};

/// Geometries and property table of a GeoJSON document.
///
/// Accepts a FeatureCollection, a single Feature or a bare geometry. Each
/// property becomes a column typed from its values: Int64 when every value is
/// an integer, Float64 for other numbers, Boolean, otherwise String.
pub(crate) fn read_features(bytes: &[u8]) -> Result<(Vec<Geometry<f64>>, DataFrame)> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson] invalid JSON")?;

    let features = match value["type"].as_str() {
        Some("FeatureCollection") => value["features"].as_array()
            .context("[io::geojson] FeatureCollection without `features`")?
            .iter()
            .collect::<Vec<_>>(),
        Some("Feature") => vec![&value],
        Some(_) => {
            let geometry = parse_geometry(&value).context("[io::geojson] bare geometry")?;
            return Ok((vec![geometry], DataFrame::empty_with_height(1)))
        }
        None => bail!("[io::geojson] document has no `type`"),
    };

    let geometries = features.iter().enumerate()
        .map(|(i, feature)| parse_geometry(&feature["geometry"]).with_context(|| format!("[io::geojson] feature {i}")))
        .collect::<Result<Vec<_>>>()?;

    let properties = features.iter()
        .map(|feature| feature["properties"].as_object())
        .collect::<Vec<_>>();
    let mut names = Vec::<&String>::new();
    for map in properties.iter().flatten() {
        for name in map.keys() {
            if !names.contains(&name) { names.push(name) }
        }
    }
    let columns = names.into_iter()
        .map(|name| {
            let values = properties.iter()
                .map(|map| map.and_then(|m| m.get(name.as_str())).filter(|v| !v.is_null()))
                .collect::<Vec<_>>();
            property_column(name, &values)
        })
        .collect::<Vec<_>>();

    let data = match columns.is_empty() {
        true => DataFrame::empty_with_height(geometries.len()),
        false => DataFrame::new(columns)?,
    };
    Ok((geometries, data))
}

/// One property column, typed from the values that are present.
fn property_column(name: &str, values: &[Option<&Value>]) -> Column {
    let present = values.iter().flatten().collect::<Vec<_>>();
    if present.is_empty() {
        Column::new(name.into(), values.iter().map(|_| None).collect::<Vec<Option<f64>>>())
    } else if present.iter().all(|v| v.is_i64()) {
        Column::new(name.into(), values.iter().map(|v| v.and_then(Value::as_i64)).collect::<Vec<_>>())
    } else if present.iter().all(|v| v.is_number()) {
        Column::new(name.into(), values.iter().map(|v| v.and_then(Value::as_f64)).collect::<Vec<_>>())
    } else if present.iter().all(|v| v.is_boolean()) {
        Column::new(name.into(), values.iter().map(|v| v.and_then(Value::as_bool)).collect::<Vec<_>>())
    } else {
        Column::new(name.into(), values.iter()
            .map(|v| v.map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }))
            .collect::<Vec<_>>())
    }
}

fn parse_coord(value: &Value) -> Result<Coord<f64>> {
    let pair = value.as_array().filter(|a| a.len() >= 2).ok_or_else(|| anyhow!("position must be [x, y]"))?;
    let x = pair[0].as_f64().ok_or_else(|| anyhow!("x must be a number"))?;
    let y = pair[1].as_f64().ok_or_else(|| anyhow!("y must be a number"))?;
    Ok(Coord { x, y })
}

fn parse_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| anyhow!("{what} must be an array"))
}

fn parse_line(value: &Value) -> Result<LineString<f64>> {
    Ok(LineString(parse_array(value, "line")?.iter().map(parse_coord).collect::<Result<_>>()?))
}

/// `[exterior, hole, hole, ...]`; rings are closed if needed.
fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let mut rings = parse_array(value, "polygon")?.iter().map(parse_line);
    let exterior = rings.next().ok_or_else(|| anyhow!("polygon has no exterior ring"))??;
    Ok(Polygon::new(exterior, rings.collect::<Result<Vec<_>>>()?))
}

fn parse_geometry(value: &Value) -> Result<Geometry<f64>> {
    let coords = &value["coordinates"];
    Ok(match value["type"].as_str() {
        Some("Polygon") => Geometry::Polygon(parse_polygon(coords)?),
        Some("MultiPolygon") => Geometry::MultiPolygon(MultiPolygon(
            parse_array(coords, "coordinates")?.iter().map(parse_polygon).collect::<Result<_>>()?)),
        Some("Point") => Geometry::Point(Point(parse_coord(coords)?)),
        Some("MultiPoint") => Geometry::MultiPoint(MultiPoint(
            parse_array(coords, "coordinates")?.iter().map(|c| parse_coord(c).map(Point)).collect::<Result<_>>()?)),
        Some("LineString") => Geometry::LineString(parse_line(coords)?),
        Some("MultiLineString") => Geometry::MultiLineString(MultiLineString(
            parse_array(coords, "coordinates")?.iter().map(parse_line).collect::<Result<_>>()?)),
        Some(other) => bail!("unsupported geometry type {other}"),
        None => bail!("geometry has no `type`"),
    })
}

fn ring_to_json(ring: &LineString<f64>) -> Value {
    Value::Array(ring.coords().map(|c| json!([c.x, c.y])).collect())
}

/// GeoJSON MultiPolygon geometry object.
pub(crate) fn multipolygon_to_geojson(shape: &MultiPolygon<f64>) -> Value {
    let polygons = shape.0.iter()
        .map(|polygon| Value::Array(std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring_to_json)
            .collect()))
        .collect::<Vec<_>>();
    json!({ "type": "MultiPolygon", "coordinates": polygons })
}

fn any_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => json!(b),
        AnyValue::String(s) => json!(s),
        AnyValue::StringOwned(s) => json!(s.as_str()),
        AnyValue::Int8(v) => json!(v),
        AnyValue::Int16(v) => json!(v),
        AnyValue::Int32(v) => json!(v),
        AnyValue::Int64(v) => json!(v),
        AnyValue::UInt8(v) => json!(v),
        AnyValue::UInt16(v) => json!(v),
        AnyValue::UInt32(v) => json!(v),
        AnyValue::UInt64(v) => json!(v),
        AnyValue::Float32(v) => json!(v),
        AnyValue::Float64(v) => json!(v),
        other => json!(other.to_string()),
    }
}

/// FeatureCollection with one feature per cell; attributes become properties
/// and neighbors the `-`-joined row indices.
pub(crate) fn write_discretization(discretization: &Discretization) -> Result<Vec<u8>> {
    let data = discretization.data();
    let features = (0..discretization.len())
        .map(|row| {
            let mut properties = Map::new();
            for column in data.get_columns() {
                properties.insert(column.name().to_string(), any_to_json(column.get(row)?));
            }
            properties.insert(NEIGHBORS.to_string(), json!(encode_neighbors(&discretization.neighbors()[row])));
            Ok(json!({
                "type": "Feature",
                "geometry": multipolygon_to_geojson(&discretization.geometries()[row]),
                "properties": properties,
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    let collection = json!({ "type": "FeatureCollection", "features": features });
    serde_json::to_vec(&collection).context("[io::geojson] serialize FeatureCollection")
}
