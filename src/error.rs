use std::fmt;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors produced while discretizing a region or enriching a discretization.
#[derive(Debug, Error)]
pub enum DiscretizeError {
    /// A parameter is outside its valid range or could not be parsed.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A record's geometry is neither a Polygon nor a MultiPolygon.
    #[error("record {record} has unsupported geometry type {found} (expected Polygon or MultiPolygon)")]
    UnsupportedGeometryType { record: usize, found: &'static str },

    /// The cell topology contradicts the tessellation (a modeling bug, not bad data).
    #[error("inconsistent topology at cell {cell}: {reason}")]
    InconsistentTopology { cell: String, reason: String },

    #[error("column `{column}` is not numeric (dtype {dtype})")]
    NonNumericColumn { column: String, dtype: String },

    #[error("failed to process column `{column}`: {reason}")]
    ColumnProcessingError { column: String, reason: String },

    /// The routing or cover service failed; no partial result is kept.
    #[error("external service error: {0}")]
    ExternalService(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl DiscretizeError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }

    /// True for the column-level errors that an overlay isolates instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NonNumericColumn { .. } | Self::ColumnProcessingError { .. })
    }
}

pub type DiscretizeResult<T> = Result<T, DiscretizeError>;

/// A non-fatal condition reported alongside a successful result.
#[derive(Debug)]
pub enum Warning {
    /// A cell the index classifies as irregular (a pentagon in H3) was kept.
    IrregularCell { cell: String },
    /// A regressor column was left out of the overlay.
    ColumnSkipped { column: String, cause: DiscretizeError },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::IrregularCell { cell } =>
                write!(f, "cell {cell} is irregular (pentagon); it is kept with fewer neighbors"),
            Warning::ColumnSkipped { column, cause } =>
                write!(f, "column `{column}` skipped: {cause}"),
        }
    }
}

/// A computed value together with the warnings raised while producing it.
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    pub(crate) fn new(value: T, warnings: Vec<Warning>) -> Self {
        Self { value, warnings }
    }

    /// Transform the value while keeping the collected warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome { value: f(self.value), warnings: self.warnings }
    }

    #[inline] pub fn into_value(self) -> T { self.value }
}
