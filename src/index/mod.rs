mod h3;

use std::{fmt::Debug, hash::Hash};

use geo::{Point, Polygon};

use crate::error::DiscretizeResult;

pub use h3::{Containment, H3Indexer};

/// A hierarchical cell index able to cover polygons and answer neighborhood queries.
///
/// Coordinates are lon/lat degrees (`x` = longitude, `y` = latitude).
pub trait CellIndexer {
    type Cell: Copy + Eq + Ord + Hash + Debug;

    /// Largest valid resolution; resolutions run from 0 to this value.
    fn max_resolution(&self) -> u8;

    /// Cells covering a single simple polygon at `resolution`.
    fn cover(&self, polygon: &Polygon<f64>, resolution: u8) -> DiscretizeResult<Vec<Self::Cell>>;

    /// Cells at grid distance exactly 1 from `cell`.
    fn ring(&self, cell: Self::Cell) -> Vec<Self::Cell>;

    /// Center of `cell` as a lon/lat point.
    fn center(&self, cell: Self::Cell) -> Point<f64>;

    /// Boundary polygon of `cell`.
    fn boundary(&self, cell: Self::Cell) -> Polygon<f64>;

    /// Geodesic area of `cell` in km².
    fn area(&self, cell: Self::Cell) -> f64;

    /// True for cells whose ring deviates from the tessellation norm (pentagons).
    fn is_irregular(&self, cell: Self::Cell) -> bool;

    /// Stable string identifier of `cell`.
    fn cell_id(&self, cell: Self::Cell) -> String;

    /// Ring size of a regular cell.
    fn expected_ring_size(&self) -> usize { 6 }
}
