//! Travel-time matrices between cell centers, fetched from a routing service.

mod batch;
#[cfg(feature = "routing")]
mod client;
mod points;

use crate::error::DiscretizeResult;

pub use batch::{build_travel_time_matrix, travel_time_matrix, Batching};
#[cfg(feature = "routing")]
pub use client::GraphHopperClient;
pub use points::{parse_points, read_points_file};

/// A routing backend answering many-to-many travel-time queries.
///
/// Points are `(lon, lat)` pairs. `times(from, to)[i][j]` is the travel time
/// in seconds from `from[i]` to `to[j]`.
pub trait TravelTimeService {
    fn times(&self, from: &[(f64, f64)], to: &[(f64, f64)]) -> DiscretizeResult<Vec<Vec<f64>>>;

    /// Largest `from.len() * to.len()` the service accepts in one request.
    fn max_elements(&self) -> usize { usize::MAX }
}

impl<S: TravelTimeService + ?Sized> TravelTimeService for &S {
    fn times(&self, from: &[(f64, f64)], to: &[(f64, f64)]) -> DiscretizeResult<Vec<Vec<f64>>> {
        (**self).times(from, to)
    }

    fn max_elements(&self) -> usize { (**self).max_elements() }
}
