use geo::{Area, Coord, MultiPolygon, Rect};

use crate::{
    error::{DiscretizeError, DiscretizeResult},
    geom::{self, Geometries},
    graph::{reindex_after_clip, Neighborhood},
    region::Region,
};

/// One surviving piece of a grid square after clipping to the region.
#[derive(Debug, Clone)]
pub struct GridCell {
    /// `"{grid_index}"`, or `"{grid_index}.{piece}"` when clipping split the square.
    pub id: String,
    /// Pre-clip index of the square, `iy * nx + ix`.
    pub grid_index: usize,
    pub geometry: MultiPolygon<f64>,
}

/// A rectangular tessellation clipped to a region, with its adjacency.
#[derive(Debug, Clone)]
pub struct RectGrid {
    pub nx: usize,
    pub ny: usize,
    pub neighborhood: Neighborhood,
    pub cells: Vec<GridCell>,
    /// Row indices into `cells`.
    pub neighbors: Vec<Vec<u32>>,
}

impl RectGrid {
    #[inline] pub fn len(&self) -> usize { self.cells.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.cells.is_empty() }
}

/// Split the bounds of `region` into `nx × ny` squares and clip them to the region.
///
/// Squares with no area inside the region are dropped. A square cut into
/// several disjoint pieces yields one cell per piece.
pub fn generate_rect_grid(region: &Region, nx: usize, ny: usize, neighborhood: Neighborhood) -> DiscretizeResult<RectGrid> {
    if nx == 0 || ny == 0 {
        return Err(DiscretizeError::invalid("grid", format!("nx and ny must be positive, got {nx}x{ny}")))
    }

    let shapes = Geometries::new(region.to_wgs84()?.multipolygons()?);
    let bounds = shapes.bounds()
        .filter(|b| b.width() > 0.0 && b.height() > 0.0)
        .ok_or_else(|| DiscretizeError::invalid("region", "region has an empty or degenerate extent"))?;
    let outline = shapes.union().unwrap_or_else(|| MultiPolygon(vec![]));

    let (min, max) = (bounds.min(), bounds.max());
    let (dx, dy) = (bounds.width() / nx as f64, bounds.height() / ny as f64);
    // Pieces below this are numerical slivers along the outline.
    let min_area = dx * dy * 1e-12;

    let mut cells = Vec::new();
    for iy in 0..ny {
        for ix in 0..nx {
            let grid_index = iy * nx + ix;
            let square = Rect::new(
                Coord { x: min.x + ix as f64 * dx, y: min.y + iy as f64 * dy },
                Coord {
                    x: if ix + 1 == nx { max.x } else { min.x + (ix + 1) as f64 * dx },
                    y: if iy + 1 == ny { max.y } else { min.y + (iy + 1) as f64 * dy },
                },
            );
            if shapes.query(&square).next().is_none() { continue }

            let pieces = geom::intersection(&MultiPolygon(vec![square.to_polygon()]), &outline).0.into_iter()
                .filter(|piece| piece.unsigned_area() > min_area)
                .collect::<Vec<_>>();

            let split = pieces.len() > 1;
            cells.extend(pieces.into_iter().enumerate().map(|(k, piece)| GridCell {
                id: if split { format!("{grid_index}.{k}") } else { grid_index.to_string() },
                grid_index,
                geometry: MultiPolygon(vec![piece]),
            }));
        }
    }

    let squares = cells.iter().map(|cell| cell.grid_index).collect::<Vec<_>>();
    let neighbors = reindex_after_clip(&squares, nx, ny, neighborhood)?;
    log::debug!("rectangle grid {nx}x{ny}: kept {} pieces", cells.len());

    Ok(RectGrid { nx, ny, neighborhood, cells, neighbors })
}
