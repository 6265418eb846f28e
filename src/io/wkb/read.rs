//! WKB reading operations.

use std::io::{Cursor, Read};

use anyhow::{bail, ensure, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};

use super::{WKB_LE, WKB_MULTIPOLYGON, WKB_POLYGON};

struct WkbReader<'a> {
    cursor: Cursor<&'a [u8]>,
    is_le: bool,
}

impl<'a> WkbReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(bytes), is_le: true }
    }

    fn byte_order(&mut self) -> Result<()> {
        let mut byte_order = [0u8; 1];
        self.cursor.read_exact(&mut byte_order)
            .context("[io::wkb::read] Failed to read byte order")?;
        self.is_le = byte_order[0] == WKB_LE;
        Ok(())
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.cursor.read_exact(&mut bytes)
            .with_context(|| format!("[io::wkb::read] Failed to read {what}"))?;
        Ok(if self.is_le { u32::from_le_bytes(bytes) } else { u32::from_be_bytes(bytes) })
    }

    fn f64(&mut self) -> Result<f64> {
        let mut bytes = [0u8; 8];
        self.cursor.read_exact(&mut bytes)
            .context("[io::wkb::read] Failed to read coordinate")?;
        Ok(if self.is_le { f64::from_le_bytes(bytes) } else { f64::from_be_bytes(bytes) })
    }

    /// Byte order and geometry type of the next geometry.
    fn header(&mut self) -> Result<u32> {
        self.byte_order()?;
        self.u32("geometry type")
    }

    fn ring(&mut self) -> Result<LineString<f64>> {
        let len = self.u32("ring length")?;
        let coords = (0..len)
            .map(|_| Ok(Coord { x: self.f64()?, y: self.f64()? }))
            .collect::<Result<Vec<_>>>()?;
        Ok(LineString::from(coords))
    }

    /// Polygon body, after its header.
    fn polygon(&mut self) -> Result<Polygon<f64>> {
        let num_rings = self.u32("number of rings")?;
        ensure!(num_rings > 0, "[io::wkb::read] Polygon must have at least one ring");

        let exterior = self.ring()?;
        let interiors = (1..num_rings)
            .map(|_| self.ring())
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon::new(exterior, interiors))
    }
}

/// Decode a WKB Polygon or MultiPolygon (either byte order) as a MultiPolygon.
pub fn multipolygon_from_wkb(bytes: &[u8]) -> Result<MultiPolygon<f64>> {
    let mut reader = WkbReader::new(bytes);
    match reader.header()? {
        WKB_POLYGON => Ok(MultiPolygon(vec![reader.polygon()?])),
        WKB_MULTIPOLYGON => {
            let count = reader.u32("polygon count")?;
            let polygons = (0..count)
                .map(|_| {
                    let ty = reader.header()?;
                    ensure!(ty == WKB_POLYGON, "[io::wkb::read] Expected Polygon inside MultiPolygon, got type {ty}");
                    reader.polygon()
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(MultiPolygon(polygons))
        }
        other => bail!("[io::wkb::read] Expected Polygon or MultiPolygon geometry type, got {other}"),
    }
}

/// Decode hex-encoded WKB text.
pub fn multipolygon_from_hex_wkb(text: &str) -> Result<MultiPolygon<f64>> {
    let bytes = hex::decode(text.trim())
        .context("[io::wkb::read] Geometry is not valid hex")?;
    multipolygon_from_wkb(&bytes)
}
