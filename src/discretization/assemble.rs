use geo::{MultiPolygon, Point};
use polars::prelude::*;

use crate::{
    cover::{generate_cover, generate_rect_grid, RectGrid},
    error::{DiscretizeError, DiscretizeResult, Outcome},
    geom,
    graph::{hex_adjacency, Neighborhood},
    index::{CellIndexer, H3Indexer},
    region::Region,
};
use super::{
    export::to_export_friendly,
    table::{Discretization, AREA, CENTER_LAT, CENTER_LON, ID, RESERVED_COLUMNS},
    ShapeSpec,
};

/// Cells of a tessellation before attributes are attached.
#[derive(Debug, Clone, Default)]
pub struct Tessellation {
    pub ids: Vec<String>,
    pub geometries: Vec<MultiPolygon<f64>>,
    /// Row indices into `ids`.
    pub neighbors: Vec<Vec<u32>>,
    /// Native cell areas; planar geometry area is used when absent.
    pub areas: Option<Vec<f64>>,
}

impl Tessellation {
    /// Hex cells with index boundaries, geodesic areas and ring adjacency.
    pub fn from_hex_cells<I: CellIndexer>(cells: &[I::Cell], indexer: &I) -> DiscretizeResult<Self> {
        Ok(Self {
            ids: cells.iter().map(|&cell| indexer.cell_id(cell)).collect(),
            geometries: cells.iter().map(|&cell| MultiPolygon(vec![indexer.boundary(cell)])).collect(),
            neighbors: hex_adjacency(cells, indexer)?,
            areas: Some(cells.iter().map(|&cell| indexer.area(cell)).collect()),
        })
    }
}

impl From<RectGrid> for Tessellation {
    fn from(grid: RectGrid) -> Self {
        let (ids, geometries) = grid.cells.into_iter()
            .map(|cell| (cell.id, cell.geometry))
            .unzip();
        Self { ids, geometries, neighbors: grid.neighbors, areas: None }
    }
}

/// Attach derived attributes to a tessellation and normalize the table.
///
/// An existing `area` column in `data` is kept; otherwise the tessellation's
/// native areas (or planar geometry areas) are used. `center_lat` and
/// `center_lon` are always recomputed from the geometry centroids.
pub fn assemble(tessellation: Tessellation, data: Option<DataFrame>) -> DiscretizeResult<Discretization> {
    let Tessellation { ids, geometries, neighbors, areas } = tessellation;
    let n = ids.len();

    if let Some(df) = &data {
        if df.height() != n {
            return Err(DiscretizeError::invalid("data", format!("{} rows for {n} cells", df.height())))
        }
    }

    let area = match data.as_ref().and_then(|df| df.column(AREA).ok()) {
        Some(existing) => existing.cast(&DataType::Float64)?,
        None => {
            let values = match areas {
                Some(values) if values.len() == n => values,
                Some(values) => return Err(DiscretizeError::invalid("areas", format!("{} areas for {n} cells", values.len()))),
                None => geometries.iter().map(geom::area).collect(),
            };
            Column::new(AREA.into(), values)
        }
    };

    let centroids = geometries.iter()
        .map(|shape| geom::centroid(shape).unwrap_or(Point::new(f64::NAN, f64::NAN)))
        .collect::<Vec<_>>();
    let mut columns = vec![
        area,
        Column::new(CENTER_LAT.into(), centroids.iter().map(|c| c.y()).collect::<Vec<_>>()),
        Column::new(CENTER_LON.into(), centroids.iter().map(|c| c.x()).collect::<Vec<_>>()),
        Column::new(ID.into(), &ids),
    ];
    if let Some(df) = &data {
        columns.extend(df.get_columns().iter()
            .filter(|c| !RESERVED_COLUMNS.contains(&c.name().as_str()) && c.name().as_str() != ID)
            .cloned());
    }

    Discretization::from_parts(ids, geometries, neighbors, DataFrame::new(columns)?)
}

/// Hex discretization of `region` with any cell index.
pub fn generate_hex_discretization<I: CellIndexer>(region: &Region, resolution: u8, indexer: &I) -> DiscretizeResult<Outcome<Discretization>> {
    let Outcome { value: cells, warnings } = generate_cover(region, resolution, indexer)?;
    let discretization = assemble(Tessellation::from_hex_cells(&cells, indexer)?, None)?;
    log::info!("hexagon discretization at resolution {resolution}: {} cells", discretization.len());
    Ok(Outcome::new(discretization, warnings))
}

/// Rectangle discretization of `region`, with a `grid_index` user column.
pub fn generate_rect_discretization(region: &Region, nx: usize, ny: usize, neighborhood: Neighborhood) -> DiscretizeResult<Discretization> {
    let grid = generate_rect_grid(region, nx, ny, neighborhood)?;
    let grid_index = grid.cells.iter().map(|cell| cell.grid_index as u32).collect::<Vec<_>>();
    let data = DataFrame::new(vec![Column::new("grid_index".into(), grid_index)])?;

    let discretization = assemble(grid.into(), Some(data))?;
    log::info!("rectangle discretization {nx}x{ny}: {} cells", discretization.len());
    Ok(discretization)
}

/// Discretize `region` into hexagons (H3) or clipped rectangles.
pub fn generate_discretization(region: &Region, shape: &ShapeSpec) -> DiscretizeResult<Outcome<Discretization>> {
    match *shape {
        ShapeSpec::Hexagon { resolution, containment } =>
            generate_hex_discretization(region, resolution, &H3Indexer::new(containment)),
        ShapeSpec::Rectangle { nx, ny, neighborhood } =>
            Ok(Outcome::new(generate_rect_discretization(region, nx, ny, neighborhood)?, vec![])),
    }
}

/// Discretize `region` straight to a table, optionally in export-friendly form.
pub fn generate_discretization_frame(region: &Region, shape: &ShapeSpec, export_friendly: bool) -> DiscretizeResult<Outcome<DataFrame>> {
    let Outcome { value, warnings } = generate_discretization(region, shape)?;
    let frame = if export_friendly { to_export_friendly(&value)? } else { value.to_dataframe()? };
    Ok(Outcome::new(frame, warnings))
}
