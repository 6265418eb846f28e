mod adjacency;
mod neighborhood;

pub use adjacency::{check_adjacency, grid_neighbors, hex_adjacency, is_symmetric, reindex_after_clip};
pub use neighborhood::Neighborhood;
