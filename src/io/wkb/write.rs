//! WKB writing operations.

use geo::{LineString, MultiPolygon, Polygon};

use super::{WKB_LE, WKB_MULTIPOLYGON, WKB_POLYGON};

fn write_ring(wkb: &mut Vec<u8>, ring: &LineString<f64>) {
    wkb.extend_from_slice(&(ring.0.len() as u32).to_le_bytes());
    for coord in ring.coords() {
        wkb.extend_from_slice(&coord.x.to_le_bytes());
        wkb.extend_from_slice(&coord.y.to_le_bytes());
    }
}

/// Write a Polygon to little-endian WKB.
fn write_polygon(wkb: &mut Vec<u8>, poly: &Polygon<f64>) {
    wkb.push(WKB_LE);
    wkb.extend_from_slice(&WKB_POLYGON.to_le_bytes());

    // Number of rings (1 exterior + interiors)
    wkb.extend_from_slice(&((1 + poly.interiors().len()) as u32).to_le_bytes());
    write_ring(wkb, poly.exterior());
    for interior in poly.interiors() {
        write_ring(wkb, interior);
    }
}

/// Encode a MultiPolygon as little-endian WKB.
pub fn multipolygon_to_wkb(shape: &MultiPolygon<f64>) -> Vec<u8> {
    let mut wkb = Vec::new();
    wkb.push(WKB_LE);
    wkb.extend_from_slice(&WKB_MULTIPOLYGON.to_le_bytes());
    wkb.extend_from_slice(&(shape.0.len() as u32).to_le_bytes());
    for poly in &shape.0 {
        write_polygon(&mut wkb, poly);
    }
    wkb
}

/// Encode a MultiPolygon as hex-encoded WKB text, for flat-file columns.
pub fn multipolygon_to_hex_wkb(shape: &MultiPolygon<f64>) -> String {
    hex::encode_upper(multipolygon_to_wkb(shape))
}
