use std::collections::BTreeSet;

use crate::{
    error::{DiscretizeError, DiscretizeResult, Outcome, Warning},
    index::CellIndexer,
    region::Region,
};

/// Cover `region` with index cells at `resolution`.
///
/// Every constituent polygon is covered on its own and the results are
/// merged into one sorted, duplicate-free list. Irregular cells are kept and
/// reported as warnings.
pub fn generate_cover<I: CellIndexer>(region: &Region, resolution: u8, indexer: &I) -> DiscretizeResult<Outcome<Vec<I::Cell>>> {
    if resolution > indexer.max_resolution() {
        return Err(DiscretizeError::invalid("resolution",
            format!("{resolution} is outside 0..={}", indexer.max_resolution())))
    }

    let polygons = region.to_wgs84()?.polygons()?;
    let mut cells = BTreeSet::new();
    for polygon in &polygons {
        cells.extend(indexer.cover(polygon, resolution)?);
    }
    log::debug!("covered {} polygons with {} cells at resolution {resolution}", polygons.len(), cells.len());

    let warnings = cells.iter()
        .filter(|&&cell| indexer.is_irregular(cell))
        .map(|&cell| {
            let warning = Warning::IrregularCell { cell: indexer.cell_id(cell) };
            log::warn!("{warning}");
            warning
        })
        .collect();

    Ok(Outcome::new(cells.into_iter().collect(), warnings))
}

#[cfg(test)]
mod tests {
    use geo::{point, polygon, Geometry, LineString, MultiPolygon, Point, Polygon};

    use super::*;

    /// Covers a polygon with the integer x-coordinates of its exterior vertices.
    struct VertexIndexer;

    impl CellIndexer for VertexIndexer {
        type Cell = i64;

        fn max_resolution(&self) -> u8 { 3 }
        fn cover(&self, polygon: &Polygon<f64>, _: u8) -> DiscretizeResult<Vec<i64>> {
            Ok(polygon.exterior().coords().map(|c| c.x as i64).collect())
        }
        fn ring(&self, cell: i64) -> Vec<i64> { vec![cell - 1, cell + 1] }
        fn center(&self, cell: i64) -> Point<f64> { point!(x: cell as f64, y: 0.0) }
        fn boundary(&self, _: i64) -> Polygon<f64> { Polygon::new(LineString::new(vec![]), vec![]) }
        fn area(&self, _: i64) -> f64 { 1.0 }
        fn is_irregular(&self, cell: i64) -> bool { cell == 7 }
        fn cell_id(&self, cell: i64) -> String { format!("c{cell}") }
    }

    fn triangle(x: f64) -> Polygon<f64> {
        polygon![(x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x, y: 1.0)]
    }

    #[test]
    fn resolution_above_maximum_is_rejected() {
        let region = Region::from_polygon(triangle(0.0));
        let err = generate_cover(&region, 4, &VertexIndexer).unwrap_err();
        assert!(matches!(err, DiscretizeError::InvalidParameter { name: "resolution", .. }));
    }

    #[test]
    fn multipolygon_parts_are_unioned_and_sorted() {
        let region = Region::new(vec![Geometry::MultiPolygon(MultiPolygon(vec![triangle(4.0), triangle(1.0), triangle(2.0)]))]);
        let cells = generate_cover(&region, 1, &VertexIndexer).unwrap();
        assert_eq!(cells.value, vec![1, 2, 3, 4, 5]);
        assert!(cells.warnings.is_empty());
    }

    #[test]
    fn irregular_cells_are_kept_with_a_warning() {
        let region = Region::from_polygon(triangle(6.0));
        let cells = generate_cover(&region, 1, &VertexIndexer).unwrap();
        assert_eq!(cells.value, vec![6, 7]);
        assert_eq!(cells.warnings.len(), 1);
        assert!(matches!(&cells.warnings[0], Warning::IrregularCell { cell } if cell == "c7"));
    }

    #[test]
    fn non_areal_record_aborts_the_cover() {
        let region = Region::new(vec![Geometry::Point(point!(x: 0.0, y: 0.0))]);
        let err = generate_cover(&region, 1, &VertexIndexer).unwrap_err();
        assert!(matches!(err, DiscretizeError::UnsupportedGeometryType { record: 0, .. }));
    }
}
