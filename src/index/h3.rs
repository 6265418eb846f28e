use std::str::FromStr;

use geo::{Coord, LineString, Point, Polygon};
use h3o::{geom::{ContainmentMode, TilerBuilder}, CellIndex, LatLng, Resolution};
use serde::{Deserialize, Serialize};

use crate::error::{DiscretizeError, DiscretizeResult};
use super::CellIndexer;

/// Which cells the polygon cover keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Containment {
    /// Cells whose center lies inside the polygon.
    Centroid,
    /// Every cell needed so the union of cells covers the polygon.
    #[default]
    Covers,
}

impl FromStr for Containment {
    type Err = DiscretizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "centroid" | "center" => Ok(Containment::Centroid),
            "covers" | "cover" => Ok(Containment::Covers),
            other => Err(DiscretizeError::invalid("containment", format!("unknown containment mode {other:?}"))),
        }
    }
}

/// H3 hexagonal index, backed by `h3o`.
#[derive(Debug, Clone, Copy, Default)]
pub struct H3Indexer {
    containment: Containment,
}

impl H3Indexer {
    pub fn new(containment: Containment) -> Self { Self { containment } }
}

impl CellIndexer for H3Indexer {
    type Cell = CellIndex;

    #[inline] fn max_resolution(&self) -> u8 { 15 }

    fn cover(&self, polygon: &Polygon<f64>, resolution: u8) -> DiscretizeResult<Vec<CellIndex>> {
        let resolution = Resolution::try_from(resolution)
            .map_err(|e| DiscretizeError::invalid("resolution", e.to_string()))?;
        let mode = match self.containment {
            Containment::Centroid => ContainmentMode::ContainsCentroid,
            Containment::Covers => ContainmentMode::Covers,
        };

        let mut tiler = TilerBuilder::new(resolution)
            .containment_mode(mode)
            .build();
        tiler.add(polygon.clone())
            .map_err(|e| DiscretizeError::ExternalService(format!("h3 cover rejected polygon: {e}")))?;

        Ok(tiler.into_coverage().collect())
    }

    fn ring(&self, cell: CellIndex) -> Vec<CellIndex> {
        cell.grid_disk::<Vec<_>>(1).into_iter()
            .filter(|&other| other != cell)
            .collect()
    }

    fn center(&self, cell: CellIndex) -> Point<f64> {
        let center = LatLng::from(cell);
        Point::new(center.lng(), center.lat())
    }

    fn boundary(&self, cell: CellIndex) -> Polygon<f64> {
        let ring = cell.boundary().iter()
            .map(|vertex| Coord { x: vertex.lng(), y: vertex.lat() })
            .collect::<Vec<_>>();
        Polygon::new(LineString::from(ring), vec![])
    }

    #[inline] fn area(&self, cell: CellIndex) -> f64 { cell.area_km2() }

    #[inline] fn is_irregular(&self, cell: CellIndex) -> bool { cell.is_pentagon() }

    #[inline] fn cell_id(&self, cell: CellIndex) -> String { cell.to_string() }
}
