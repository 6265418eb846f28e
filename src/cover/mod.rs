mod hex;
mod rect;

pub use hex::generate_cover;
pub use rect::{generate_rect_grid, GridCell, RectGrid};
