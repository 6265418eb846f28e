use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::{
    discretization::{Discretization, CENTER_LAT, CENTER_LON},
    error::{DiscretizeError, DiscretizeResult},
};
use super::TravelTimeService;

/// How the n × n matrix is cut into service requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "batching", rename_all = "snake_case")]
pub enum Batching {
    /// Square blocks: one request per (origin group, destination group).
    Chunked { group_size: usize },
    /// Origin slices against every destination, halved until a request
    /// holds at most `max_elements` entries.
    Split { max_elements: usize },
}

impl Default for Batching {
    fn default() -> Self { Batching::Chunked { group_size: 5 } }
}

/// Travel times between every pair of cell centers of `discretization`.
///
/// Entry `[i, j]` is the time from cell `i` to cell `j`; the matrix is not
/// symmetric in general. Any failed request aborts the whole build.
pub fn build_travel_time_matrix<S: TravelTimeService>(
    discretization: &Discretization,
    service: &S,
    batching: Batching,
) -> DiscretizeResult<Array2<f64>> {
    let lon = discretization.values(CENTER_LON)?;
    let lat = discretization.values(CENTER_LAT)?;
    let points = lon.into_iter().zip(lat).collect::<Vec<_>>();
    travel_time_matrix(&points, service, batching)
}

/// Travel times between every pair of `(lon, lat)` points.
pub fn travel_time_matrix<S: TravelTimeService>(
    points: &[(f64, f64)],
    service: &S,
    batching: Batching,
) -> DiscretizeResult<Array2<f64>> {
    let n = points.len();
    let mut times = Array2::<f64>::zeros((n, n));
    if n == 0 { return Ok(times) }

    match batching {
        Batching::Chunked { group_size } => {
            if group_size == 0 || group_size.saturating_mul(group_size) > service.max_elements() {
                return Err(DiscretizeError::invalid("group_size", format!(
                    "{group_size} (a {group_size}×{group_size} block must hold between 1 and {} entries)",
                    service.max_elements())))
            }
            let requests = n.div_ceil(group_size).pow(2);
            log::info!("travel times: {n} points in {requests} chunked requests");

            for (gi, from) in points.chunks(group_size).enumerate() {
                for (gj, to) in points.chunks(group_size).enumerate() {
                    let (i0, j0) = (gi * group_size, gj * group_size);
                    let block = request(service, from, to)?;
                    times.slice_mut(s![i0..i0 + from.len(), j0..j0 + to.len()]).assign(&block);
                }
            }
        }
        Batching::Split { max_elements } => {
            let limit = max_elements.min(service.max_elements());
            if n > limit {
                return Err(DiscretizeError::invalid("max_elements", format!(
                    "{n} destinations do not fit in a request of {limit} entries")))
            }
            log::info!("travel times: {n} points, at most {limit} entries per request");
            split(service, points, 0, points, limit, &mut times)?;
        }
    }

    Ok(times)
}

/// Fill rows `offset..offset + from.len()`, halving the origins while the
/// request would be too large.
fn split<S: TravelTimeService>(
    service: &S,
    from: &[(f64, f64)],
    offset: usize,
    to: &[(f64, f64)],
    limit: usize,
    times: &mut Array2<f64>,
) -> DiscretizeResult<()> {
    if from.len() * to.len() > limit && from.len() > 1 {
        let half = from.len() / 2;
        split(service, &from[..half], offset, to, limit, times)?;
        return split(service, &from[half..], offset + half, to, limit, times)
    }
    let block = request(service, from, to)?;
    times.slice_mut(s![offset..offset + from.len(), ..]).assign(&block);
    Ok(())
}

/// One service call, with the response checked against the request shape.
fn request<S: TravelTimeService>(service: &S, from: &[(f64, f64)], to: &[(f64, f64)]) -> DiscretizeResult<Array2<f64>> {
    let rows = service.times(from, to)?;
    if rows.len() != from.len() || rows.iter().any(|row| row.len() != to.len()) {
        return Err(DiscretizeError::ExternalService(format!(
            "expected a {}×{} times array, got {} rows", from.len(), to.len(), rows.len())))
    }
    log::debug!("travel times: {}×{} block received", from.len(), to.len());

    let flat = rows.into_iter().flatten().collect::<Vec<_>>();
    Array2::from_shape_vec((from.len(), to.len()), flat)
        .map_err(|e| DiscretizeError::ExternalService(e.to_string()))
}
