use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{error::DiscretizeError, graph::Neighborhood, index::Containment};

/// Tessellation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Hexagon,
    Rectangle,
}

impl FromStr for ShapeKind {
    type Err = DiscretizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hexagon" | "hex" | "h3" => Ok(ShapeKind::Hexagon),
            "rectangle" | "rect" | "square" | "squares" => Ok(ShapeKind::Rectangle),
            other => Err(DiscretizeError::invalid("shape", format!("unknown shape {other:?} (expected hexagon or rectangle)"))),
        }
    }
}

/// Tessellation family together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ShapeSpec {
    Hexagon { resolution: u8, #[serde(default)] containment: Containment },
    Rectangle { nx: usize, ny: usize, #[serde(default)] neighborhood: Neighborhood },
}

impl ShapeSpec {
    #[inline] pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeSpec::Hexagon { .. } => ShapeKind::Hexagon,
            ShapeSpec::Rectangle { .. } => ShapeKind::Rectangle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_names_parse() {
        assert_eq!("hexagon".parse::<ShapeKind>().unwrap(), ShapeKind::Hexagon);
        assert_eq!("Rectangle".parse::<ShapeKind>().unwrap(), ShapeKind::Rectangle);
        assert!(matches!("triangle".parse::<ShapeKind>(), Err(DiscretizeError::InvalidParameter { name: "shape", .. })));
    }

    #[test]
    fn shape_spec_from_json_with_defaults() {
        let spec: ShapeSpec = serde_json::from_str(r#"{"shape": "rectangle", "nx": 3, "ny": 2}"#).unwrap();
        assert_eq!(spec, ShapeSpec::Rectangle { nx: 3, ny: 2, neighborhood: Neighborhood::Queen });
        assert_eq!(spec.kind(), ShapeKind::Rectangle);

        let spec: ShapeSpec = serde_json::from_str(r#"{"shape": "hexagon", "resolution": 9, "containment": "centroid"}"#).unwrap();
        assert_eq!(spec, ShapeSpec::Hexagon { resolution: 9, containment: Containment::Centroid });
    }
}
