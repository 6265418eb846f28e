use std::{io::Cursor, path::Path, sync::Arc};

use anyhow::{ensure, Context, Result};
use ndarray::Array2;
use polars::{io::{SerReader, SerWriter}, prelude::*};

use crate::discretization::{GEOMETRY, ID, NEIGHBORS};
use super::fs::PendingWrite;

/// Columns that must stay text whatever they look like: ids may carry
/// leading zeros and a single neighbor token looks like an integer.
fn text_schema() -> SchemaRef {
    Arc::new(Schema::from_iter([
        Field::new(GEOMETRY.into(), DataType::String),
        Field::new(ID.into(), DataType::String),
        Field::new(NEIGHBORS.into(), DataType::String),
    ]))
}

/// Read a CSV table with `geometry`, `id` and `neighbors` kept as strings.
pub(crate) fn read_table(bytes: &[u8]) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(text_schema()))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .context("[io::csv] failed to read CSV table")
}

/// Write a table to CSV bytes.
pub(crate) fn write_table_bytes(df: &mut DataFrame) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    CsvWriter::new(&mut out)
        .include_header(true)
        .finish(df)
        .context("[io::csv] failed to write CSV table")?;
    Ok(out)
}

/// Write an n × n travel-time matrix, one column per destination cell id.
pub fn write_matrix_csv(times: &Array2<f64>, ids: &[String], path: &Path, force: bool) -> Result<()> {
    ensure!(times.nrows() == ids.len() && times.ncols() == ids.len(),
        "[io::csv] matrix is {}×{} but there are {} cell ids", times.nrows(), times.ncols(), ids.len());

    let columns = ids.iter().zip(times.columns())
        .map(|(id, column)| Column::new(id.as_str().into(), column.to_vec()))
        .collect::<Vec<_>>();
    let mut df = DataFrame::new(columns)?;

    let mut sink = PendingWrite::open(path, force)?;
    CsvWriter::new(&mut sink)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("[io::csv] failed to write matrix to {}", path.display()))?;
    sink.finalize()
}

/// Read back a matrix written by [`write_matrix_csv`], with its column ids.
pub fn read_matrix_csv(path: &Path) -> Result<(Vec<String>, Array2<f64>)> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("[io::csv] read {}", path.display()))?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .with_context(|| format!("[io::csv] parse {}", path.display()))?;

    let ids = df.get_column_names().iter().map(|name| name.to_string()).collect::<Vec<_>>();
    let mut times = Array2::<f64>::zeros((df.height(), df.width()));
    for (j, column) in df.get_columns().iter().enumerate() {
        let values = column.cast(&DataType::Float64)?;
        for (i, value) in values.f64()?.into_iter().enumerate() {
            times[[i, j]] = value.unwrap_or(f64::NAN);
        }
    }
    Ok((ids, times))
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn text_columns_keep_leading_zeros() {
        let text = "geometry,id,neighbors,pop\nAB,007,1,3\nCD,010,0,4\n";
        let df = read_table(text.as_bytes()).unwrap();
        assert_eq!(df.column(ID).unwrap().str().unwrap().get(0), Some("007"));
        assert_eq!(df.column(NEIGHBORS).unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("pop").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn matrix_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("times.csv");
        let times = array![[0.0, 61.5], [75.0, 0.0]];
        let ids = vec!["a".to_string(), "b".to_string()];

        write_matrix_csv(&times, &ids, &path, false).unwrap();
        let (read_ids, read_times) = read_matrix_csv(&path).unwrap();
        assert_eq!(read_ids, ids);
        assert_eq!(read_times, times);
    }

    #[test]
    fn matrix_shape_must_match_ids() {
        let dir = tempfile::tempdir().unwrap();
        let times = array![[0.0, 1.0], [1.0, 0.0]];
        assert!(write_matrix_csv(&times, &["a".to_string()], &dir.path().join("m.csv"), false).is_err());
    }
}
