use polars::prelude::*;

use crate::{
    error::{DiscretizeError, DiscretizeResult},
    io::wkb::{multipolygon_from_hex_wkb, multipolygon_from_wkb, multipolygon_to_hex_wkb},
};
use super::{
    assemble::{assemble, Tessellation},
    table::{Discretization, GEOMETRY, ID, NEIGHBORS},
};

/// Separator between neighbor row indices in a flat-file token.
pub const NEIGHBOR_DELIMITER: char = '-';

/// Join neighbor row indices into a single token (`[3, 7]` -> `"3-7"`).
pub fn encode_neighbors(neighbors: &[u32]) -> String {
    neighbors.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(&NEIGHBOR_DELIMITER.to_string())
}

/// Split a neighbor token back into row indices; the empty token is the empty list.
///
/// Row indices are never negative, so a `-` can only be a separator: any
/// empty or non-numeric piece (as in `"-3"`) is rejected.
pub fn decode_neighbors(token: &str) -> DiscretizeResult<Vec<u32>> {
    let token = token.trim();
    if token.is_empty() { return Ok(Vec::new()) }

    token.split(NEIGHBOR_DELIMITER)
        .map(|piece| piece.trim().parse::<u32>().map_err(|_| DiscretizeError::invalid(
            "neighbors", format!("token {token:?} has {piece:?}, which is not a row index"))))
        .collect()
}

/// Flat-file form of a discretization: geometry as hex-encoded WKB text and
/// neighbors as `-`-joined row indices, in canonical column order.
pub fn to_export_friendly(discretization: &Discretization) -> DiscretizeResult<DataFrame> {
    let geometry = Column::new(GEOMETRY.into(), discretization.geometries().iter()
        .map(multipolygon_to_hex_wkb)
        .collect::<Vec<_>>());
    let neighbors = Column::new(NEIGHBORS.into(), discretization.neighbors().iter()
        .map(|list| encode_neighbors(list))
        .collect::<Vec<_>>());
    discretization.frame_with(geometry, neighbors)
}

/// Rebuild a discretization from a table produced by [`to_export_friendly`]
/// or [`Discretization::to_dataframe`].
///
/// Geometry may be hex WKB text or raw WKB; neighbors may be delimited text
/// or a list of row indices. Existing `area` values are kept.
pub fn from_export_friendly(df: &DataFrame) -> DiscretizeResult<Discretization> {
    let missing = |name: &'static str| DiscretizeError::invalid(name, format!("table has no `{name}` column"));
    let geometry = df.column(GEOMETRY).map_err(|_| missing(GEOMETRY))?;
    let neighbors = df.column(NEIGHBORS).map_err(|_| missing(NEIGHBORS))?;
    let ids = df.column(ID).map_err(|_| missing(ID))?;

    let bad_geometry = |row: usize, e: anyhow::Error| DiscretizeError::invalid(GEOMETRY, format!("row {row}: {e:#}"));
    let geometries = match geometry.dtype() {
        DataType::Binary => geometry.binary()?.into_iter().enumerate()
            .map(|(row, wkb)| multipolygon_from_wkb(wkb.unwrap_or_default()).map_err(|e| bad_geometry(row, e)))
            .collect::<DiscretizeResult<Vec<_>>>()?,
        _ => geometry.cast(&DataType::String)?.str()?.into_iter().enumerate()
            .map(|(row, text)| multipolygon_from_hex_wkb(text.unwrap_or_default()).map_err(|e| bad_geometry(row, e)))
            .collect::<DiscretizeResult<Vec<_>>>()?,
    };

    let neighbors = match neighbors.dtype() {
        DataType::List(_) => neighbors.list()?.into_iter().enumerate()
            .map(|(row, list)| match list {
                Some(series) => series.cast(&DataType::UInt32)?.u32()?.into_iter()
                    .map(|j| j.ok_or_else(|| DiscretizeError::invalid(
                        NEIGHBORS, format!("row {row} has a null or negative neighbor"))))
                    .collect::<DiscretizeResult<Vec<u32>>>(),
                None => Ok(Vec::new()),
            })
            .collect::<DiscretizeResult<Vec<_>>>()?,
        _ => neighbors.cast(&DataType::String)?.str()?.into_iter()
            .map(|token| decode_neighbors(token.unwrap_or_default()))
            .collect::<DiscretizeResult<Vec<_>>>()?,
    };

    let ids = ids.cast(&DataType::String)?.str()?.into_iter().enumerate()
        .map(|(row, id)| id.map(str::to_string)
            .ok_or_else(|| DiscretizeError::invalid(ID, format!("row {row} has no id"))))
        .collect::<DiscretizeResult<Vec<_>>>()?;

    let data = DataFrame::new(df.get_columns().iter()
        .filter(|c| !matches!(c.name().as_str(), GEOMETRY | NEIGHBORS))
        .cloned()
        .collect())?;

    assemble(Tessellation { ids, geometries, neighbors, areas: None }, Some(data))
}
