use std::{fs, path::Path};

use anyhow::{bail, Context, Result};

/// Read a point list: a count on the first line, then one `lat lon` pair per
/// line. Points are returned as `(lon, lat)`.
pub fn read_points_file(path: &Path) -> Result<Vec<(f64, f64)>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("[travel::points] read {}", path.display()))?;
    parse_points(&text).with_context(|| format!("[travel::points] parse {}", path.display()))
}

/// Parse the contents of a point list file.
pub fn parse_points(text: &str) -> Result<Vec<(f64, f64)>> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let count = lines.next()
        .context("missing point count")?
        .parse::<usize>()
        .context("point count is not a non-negative integer")?;

    let points = lines.enumerate()
        .map(|(i, line)| {
            let fields = line.split_whitespace().collect::<Vec<_>>();
            let [lat, lon] = fields.as_slice() else {
                bail!("line {}: expected `lat lon`, got {line:?}", i + 2)
            };
            let lat = lat.parse::<f64>().with_context(|| format!("line {}: bad latitude", i + 2))?;
            let lon = lon.parse::<f64>().with_context(|| format!("line {}: bad longitude", i + 2))?;
            Ok((lon, lat))
        })
        .collect::<Result<Vec<_>>>()?;

    if points.len() != count {
        bail!("header announces {count} points but {} were listed", points.len());
    }
    Ok(points)
}
