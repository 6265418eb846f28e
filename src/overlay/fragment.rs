use geo::MultiPolygon;

use crate::{discretization::Discretization, geom};
use super::regressor::Regressor;

/// The piece of one cell that overlaps one regressor record.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Row of the discretization cell.
    pub cell: usize,
    /// Row of the regressor record.
    pub record: usize,
    pub geometry: MultiPolygon<f64>,
    /// Planar area of `geometry`.
    pub area: f64,
}

/// Every (cell, record) overlap with positive area, ordered by cell then record.
pub fn overlay_fragments(discretization: &Discretization, regressor: &Regressor) -> Vec<Fragment> {
    discretization.geometries().iter().enumerate()
        .flat_map(|(cell, shape)| {
            regressor.geoms().candidates(shape).into_iter()
                .filter_map(move |record| {
                    let geometry = geom::intersection(shape, &regressor.geometries()[record]);
                    let area = geom::area(&geometry);
                    (area > 0.0).then_some(Fragment { cell, record, geometry, area })
                })
        })
        .collect()
}
