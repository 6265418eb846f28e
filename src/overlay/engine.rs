use std::borrow::Cow;

use polars::prelude::*;

use crate::{
    discretization::{Discretization, ID, RESERVED_COLUMNS},
    error::{DiscretizeError, DiscretizeResult, Outcome, Warning},
};
use super::{
    columns::{classify_columns, ColumnClass},
    fragment::{overlay_fragments, Fragment},
    policy::AllocationPolicy,
    regressor::Regressor,
};

const JOIN_KEY: &str = "__overlay_key";
const ROW: &str = "__overlay_row";

/// Output column for a regressor column, renamed when it would shadow a
/// reserved column or the join column.
fn output_name(column: &str, id_column: &str) -> String {
    if RESERVED_COLUMNS.contains(&column) || column == ID || column == id_column {
        format!("{column}_regressor")
    } else {
        column.to_string()
    }
}

/// Each fragment's share of one regressor column.
fn contributions(data: &DataFrame, column: &str, records: &IdxCa, fractions: &[f64]) -> PolarsResult<Column> {
    let values = data.column(column)?
        .as_materialized_series()
        .cast(&DataType::Float64)?
        .take(records)?;
    let scaled = values.f64()?.into_iter()
        .zip(fractions)
        .map(|(value, fraction)| value.map(|v| v * fraction))
        .collect::<Float64Chunked>();
    Ok(scaled.with_name(column.into()).into_column())
}

/// Redistribute regressor attributes onto the cells of a discretization.
///
/// Every fragment contributes `value × fraction` (fraction per `policy`),
/// contributions are summed per `id_column` value and left-joined back so
/// every cell keeps its row; cells without overlap get 0. Columns that are
/// not numeric or fail to scale are skipped with a warning. The input
/// discretization is left untouched.
pub fn overlay_regressor(
    discretization: &Discretization,
    regressor: &Regressor,
    policy: AllocationPolicy,
    id_column: &str,
    target_columns: Option<&[String]>,
) -> DiscretizeResult<Outcome<Discretization>> {
    let base = discretization.data();
    let keys = base.column(id_column)
        .map_err(|_| DiscretizeError::invalid("id_column", format!("discretization has no column `{id_column}`")))?
        .as_materialized_series()
        .cast(&DataType::String)?;
    if keys.n_unique()? != keys.len() {
        return Err(DiscretizeError::invalid("id_column",
            format!("`{id_column}` has repeated values; overlay results are joined on it")))
    }

    let regressor = match regressor.crs().is_wgs84() {
        true => Cow::Borrowed(regressor),
        false => Cow::Owned(regressor.to_wgs84()?),
    };

    let mut warnings = Vec::new();
    let mut skip = |column: String, cause: DiscretizeError| {
        let warning = Warning::ColumnSkipped { column, cause };
        log::warn!("{warning}");
        warnings.push(warning);
    };

    let numeric = classify_columns(regressor.data(), target_columns).into_iter()
        .filter_map(|(name, class)| match class {
            ColumnClass::Numeric => Some(name),
            ColumnClass::Skip(cause) => { skip(name, cause); None }
        })
        .collect::<Vec<_>>();

    let fragments = overlay_fragments(discretization, &regressor);
    let cell_areas = discretization.geoms().areas();
    let record_areas = regressor.geoms().areas();
    let fractions = fragments.iter()
        .map(|f| policy.fraction(f.area, cell_areas[f.cell], record_areas[f.record]))
        .collect::<Vec<_>>();
    log::debug!("overlay: {} fragments from {} cells and {} records", fragments.len(), discretization.len(), regressor.len());

    let index = |pick: fn(&Fragment) -> usize| IdxCa::from_vec(PlSmallStr::EMPTY,
        fragments.iter().map(|f| pick(f) as IdxSize).collect());
    let (cells, records) = (index(|f| f.cell), index(|f| f.record));

    let mut columns = vec![keys.take(&cells)?.with_name(JOIN_KEY.into()).into_column()];
    let mut outputs: Vec<String> = Vec::new();
    for name in numeric {
        let output = output_name(&name, id_column);
        if output == JOIN_KEY || output == ROW || outputs.contains(&output) {
            let reason = format!("output column `{output}` is already taken");
            skip(name.clone(), DiscretizeError::ColumnProcessingError { column: name, reason });
            continue
        }
        match contributions(regressor.data(), &name, &records, &fractions) {
            Ok(column) => {
                columns.push(column.with_name(output.as_str().into()));
                outputs.push(output);
            }
            Err(e) => skip(name.clone(), DiscretizeError::ColumnProcessingError { column: name, reason: e.to_string() }),
        }
    }

    let aggregated = DataFrame::new(columns)?.lazy()
        .group_by([col(JOIN_KEY)])
        .agg(outputs.iter()
            .map(|name| col(name.as_str()).sum().alias(name.as_str()))
            .collect::<Vec<_>>())
        .collect()?;

    // Same-named user columns are replaced by the new values.
    let mut base = base.clone();
    for name in &outputs {
        if base.column(name).is_ok() {
            base.drop_in_place(name)?;
        }
    }

    let joined = base.with_row_index(ROW.into(), None)?.lazy()
        .with_column(col(id_column).cast(DataType::String).alias(JOIN_KEY))
        .left_join(aggregated.lazy(), col(JOIN_KEY), col(JOIN_KEY))
        .with_columns(outputs.iter()
            .map(|name| col(name.as_str()).fill_null(lit(0.0)))
            .collect::<Vec<_>>())
        .collect()?
        .sort([ROW], SortMultipleOptions::default())?
        .drop(ROW)?
        .drop(JOIN_KEY)?;

    log::info!("overlay ({policy}): {} columns added, {} skipped", outputs.len(), warnings.len());
    Ok(Outcome::new(discretization.with_data(joined)?, warnings))
}
