use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DiscretizeError;

/// How a regressor value is shared among the cells it overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// Fraction of the *cell* covered by the record: for attributes spread
    /// over space, such as land-use shares.
    WeightedAverage,
    /// Fraction of the *record* inside the cell: for counts assumed uniform
    /// over the record, such as population.
    UniformDistribution,
}

impl AllocationPolicy {
    /// Allocation fraction of one fragment; a zero denominator allocates nothing.
    #[inline]
    pub fn fraction(self, fragment_area: f64, cell_area: f64, record_area: f64) -> f64 {
        let whole = match self {
            AllocationPolicy::WeightedAverage => cell_area,
            AllocationPolicy::UniformDistribution => record_area,
        };
        if whole > 0.0 { fragment_area / whole } else { 0.0 }
    }
}

impl FromStr for AllocationPolicy {
    type Err = DiscretizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "weighted" | "weighted_average" => Ok(AllocationPolicy::WeightedAverage),
            "uniform" | "uniform_distribution" => Ok(AllocationPolicy::UniformDistribution),
            other => Err(DiscretizeError::invalid("policy", format!("unknown allocation policy {other:?}"))),
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationPolicy::WeightedAverage => write!(f, "weighted"),
            AllocationPolicy::UniformDistribution => write!(f, "uniform"),
        }
    }
}
