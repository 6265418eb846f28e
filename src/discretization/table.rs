use ahash::AHashMap;
use geo::MultiPolygon;
use polars::prelude::*;

use crate::{
    error::{DiscretizeError, DiscretizeResult},
    geom::Geometries,
    graph::check_adjacency,
    io::wkb::multipolygon_to_wkb,
};

pub const GEOMETRY: &str = "geometry";
pub const AREA: &str = "area";
pub const CENTER_LAT: &str = "center_lat";
pub const CENTER_LON: &str = "center_lon";
pub const NEIGHBORS: &str = "neighbors";
pub const ID: &str = "id";

/// Columns every discretization table carries, in canonical order.
pub const RESERVED_COLUMNS: [&str; 5] = [GEOMETRY, AREA, CENTER_LAT, CENTER_LON, NEIGHBORS];

/// A discretized region: cells with unique ids, geometries, an adjacency
/// graph over row indices, and a table of per-cell attributes.
///
/// `data` holds `area`, `center_lat`, `center_lon`, `id` and any user
/// columns, one row per cell, in row order.
#[derive(Debug, Clone)]
pub struct Discretization {
    ids: Vec<String>,
    index: AHashMap<String, u32>,
    geoms: Geometries,
    neighbors: Vec<Vec<u32>>,
    data: DataFrame,
}

impl Discretization {
    /// Validate and bundle the parts of a discretization.
    pub(crate) fn from_parts(ids: Vec<String>, shapes: Vec<MultiPolygon<f64>>, neighbors: Vec<Vec<u32>>, data: DataFrame) -> DiscretizeResult<Self> {
        if shapes.len() != ids.len() || data.height() != ids.len() {
            return Err(DiscretizeError::invalid("cells", format!(
                "{} ids, {} geometries and {} data rows", ids.len(), shapes.len(), data.height())))
        }
        check_adjacency(&ids, &neighbors)?;

        let mut index = AHashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), i as u32).is_some() {
                return Err(DiscretizeError::invalid("id", format!("duplicate cell id {id:?}")))
            }
        }

        Ok(Self { ids, index, geoms: Geometries::new(shapes), neighbors, data })
    }

    /// Same cells with a replacement attribute table.
    pub(crate) fn with_data(&self, data: DataFrame) -> DiscretizeResult<Self> {
        if data.height() != self.len() {
            return Err(DiscretizeError::invalid("data", format!("{} rows for {} cells", data.height(), self.len())))
        }
        Ok(Self { data, ..self.clone() })
    }

    #[inline] pub fn len(&self) -> usize { self.ids.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    #[inline] pub fn ids(&self) -> &[String] { &self.ids }

    /// Row index of the cell with the given id.
    #[inline] pub fn row_of(&self, id: &str) -> Option<usize> { self.index.get(id).map(|&i| i as usize) }

    #[inline] pub fn geometries(&self) -> &[MultiPolygon<f64>] { self.geoms.shapes() }

    #[inline] pub(crate) fn geoms(&self) -> &Geometries { &self.geoms }

    /// Neighbor lists as row indices.
    #[inline] pub fn neighbors(&self) -> &[Vec<u32>] { &self.neighbors }

    /// Neighbor ids of the cell at `row`.
    pub fn neighbor_ids(&self, row: usize) -> Vec<&str> {
        self.neighbors.get(row).into_iter().flatten()
            .map(|&j| self.ids[j as usize].as_str())
            .collect()
    }

    /// Attribute table (everything except geometry and neighbors).
    #[inline] pub fn data(&self) -> &DataFrame { &self.data }

    /// Attribute column as f64, if present and numeric.
    pub fn values(&self, column: &str) -> DiscretizeResult<Vec<f64>> {
        Ok(self.data.column(column)?
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }

    /// Full table in canonical column order: `geometry` (WKB), `area`,
    /// `center_lat`, `center_lon`, `neighbors` (row indices), then `id` and
    /// user columns.
    pub fn to_dataframe(&self) -> DiscretizeResult<DataFrame> {
        let wkbs = self.geometries().iter().map(multipolygon_to_wkb).collect::<Vec<_>>();
        let geometry = BinaryChunked::from_slice(GEOMETRY.into(), &wkbs).into_column();

        let neighbors = Column::new(NEIGHBORS.into(), self.neighbors.iter()
            .map(|list| Series::new(PlSmallStr::EMPTY, list.as_slice()))
            .collect::<Vec<_>>());

        self.frame_with(geometry, neighbors)
    }

    /// Place `geometry` and `neighbors` columns around the attribute table.
    pub(crate) fn frame_with(&self, geometry: Column, neighbors: Column) -> DiscretizeResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.data.width() + 2);
        columns.push(geometry);
        for name in [AREA, CENTER_LAT, CENTER_LON] {
            columns.push(self.data.column(name)?.clone());
        }
        columns.push(neighbors);
        columns.extend(self.data.get_columns().iter()
            .filter(|c| !RESERVED_COLUMNS.contains(&c.name().as_str()))
            .cloned());
        Ok(DataFrame::new(columns)?)
    }
}
