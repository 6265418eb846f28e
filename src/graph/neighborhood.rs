use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DiscretizeError;

/// Which grid squares count as neighbors in a rectangular tessellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Neighborhood {
    /// 4-connectivity: edge-adjacent squares only.
    Rook,
    /// 8-connectivity: edge and corner adjacent squares.
    #[default]
    Queen,
}

impl Neighborhood {
    /// Grid offsets `(dx, dy)`: E, W, N, S, then NE, SE, NW, SW for Queen.
    pub(crate) fn offsets(self) -> &'static [(i64, i64)] {
        const QUEEN: [(i64, i64); 8] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)];
        match self {
            Neighborhood::Rook => &QUEEN[..4],
            Neighborhood::Queen => &QUEEN,
        }
    }
}

impl FromStr for Neighborhood {
    type Err = DiscretizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4" | "rook" | "von-neumann" => Ok(Neighborhood::Rook),
            "8" | "queen" | "moore" => Ok(Neighborhood::Queen),
            other => Err(DiscretizeError::invalid("neighborhood", format!("unknown neighborhood {other:?} (expected 4 or 8)"))),
        }
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Neighborhood::Rook => write!(f, "4"),
            Neighborhood::Queen => write!(f, "8"),
        }
    }
}
