mod assemble;
mod export;
mod shape;
mod table;

pub use assemble::{
    assemble, generate_discretization, generate_discretization_frame,
    generate_hex_discretization, generate_rect_discretization, Tessellation,
};
pub use export::{decode_neighbors, encode_neighbors, from_export_friendly, to_export_friendly, NEIGHBOR_DELIMITER};
pub use shape::{ShapeKind, ShapeSpec};
pub use table::{Discretization, AREA, CENTER_LAT, CENTER_LON, GEOMETRY, ID, NEIGHBORS, RESERVED_COLUMNS};
