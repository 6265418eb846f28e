use polars::prelude::*;

use crate::{discretization::GEOMETRY, error::DiscretizeError};

/// What the overlay does with one regressor column, decided once per call.
#[derive(Debug)]
pub enum ColumnClass {
    /// Scaled by the allocation fraction and summed per cell.
    Numeric,
    /// Left out, with the reason reported as a warning.
    Skip(DiscretizeError),
}

/// Classify the overlay candidates of a regressor table.
///
/// Without `target_columns`, every column except `geometry` is a candidate. Requested columns that do not exist
/// are skipped rather than failing the overlay.
pub fn classify_columns(data: &DataFrame, target_columns: Option<&[String]>) -> Vec<(String, ColumnClass)> {
    let candidates = match target_columns {
        Some(columns) => columns.to_vec(),
        None => data.get_column_names().iter()
            .map(|name| name.to_string())
            .filter(|name| name != GEOMETRY)
            .collect(),
    };

    candidates.into_iter()
        .map(|name| {
            let class = match data.column(&name) {
                Err(_) => ColumnClass::Skip(DiscretizeError::ColumnProcessingError {
                    column: name.clone(),
                    reason: "no such column in the regressor table".to_string(),
                }),
                Ok(column) if is_numeric(column.dtype()) => ColumnClass::Numeric,
                Ok(column) => ColumnClass::Skip(DiscretizeError::NonNumericColumn {
                    column: name.clone(),
                    dtype: column.dtype().to_string(),
                }),
            };
            (name, class)
        })
        .collect()
}

/// Integer and floating point dtypes; booleans and text are not numeric.
fn is_numeric(dtype: &DataType) -> bool {
    matches!(dtype,
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 |
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 |
        DataType::Float32 | DataType::Float64
    )
}
