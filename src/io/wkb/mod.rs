//! Minimal Well-Known Binary codec for (Multi)Polygons.

mod read;
mod write;

pub use read::{multipolygon_from_hex_wkb, multipolygon_from_wkb};
pub use write::{multipolygon_to_hex_wkb, multipolygon_to_wkb};

/// WKB geometry type for Polygon
const WKB_POLYGON: u32 = 3;
/// WKB geometry type for MultiPolygon
const WKB_MULTIPOLYGON: u32 = 6;
/// WKB byte order: little endian
const WKB_LE: u8 = 1;

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;

    fn donut() -> MultiPolygon<f64> {
        MultiPolygon(vec![
            polygon!(
                exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
                interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0), (x: 1.0, y: 2.0)]]
            ),
            polygon![(x: 10.0, y: 10.0), (x: 11.0, y: 10.0), (x: 11.0, y: 11.0)],
        ])
    }

    #[test]
    fn multipolygon_with_hole_survives_hex_encoding() {
        let shape = donut();
        let text = multipolygon_to_hex_wkb(&shape);
        assert!(text.starts_with("0106000000"));
        assert_eq!(multipolygon_from_hex_wkb(&text).unwrap(), shape);
    }

    #[test]
    fn big_endian_polygon_is_read() {
        let mut wkb = vec![0u8];
        wkb.extend_from_slice(&WKB_POLYGON.to_be_bytes());
        wkb.extend_from_slice(&1u32.to_be_bytes());
        wkb.extend_from_slice(&4u32.to_be_bytes());
        for (x, y) in [(0.0f64, 0.0f64), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)] {
            wkb.extend_from_slice(&x.to_be_bytes());
            wkb.extend_from_slice(&y.to_be_bytes());
        }
        let shape = multipolygon_from_wkb(&wkb).unwrap();
        assert_eq!(shape.0.len(), 1);
        assert_eq!(shape.0[0].exterior().0.len(), 4);
    }

    #[test]
    fn point_and_truncated_input_are_rejected() {
        let mut point = vec![WKB_LE];
        point.extend_from_slice(&1u32.to_le_bytes());
        assert!(multipolygon_from_wkb(&point).is_err());

        let wkb = multipolygon_to_wkb(&donut());
        assert!(multipolygon_from_wkb(&wkb[..wkb.len() - 3]).is_err());
        assert!(multipolygon_from_hex_wkb("not hex").is_err());
    }
}
