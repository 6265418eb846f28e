use geo::{BoundingRect, MultiPolygon, Rect};
use rstar::{RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a shape by index.
#[derive(Debug, Clone)]
pub(super) struct BoundingBox {
    idx: usize, // Index of corresponding MultiPolygon in shapes
    bbox: Rect<f64>,
}

impl BoundingBox {
    /// Box the shape at `idx`, or `None` when the shape is empty.
    pub(super) fn of(idx: usize, shape: &MultiPolygon<f64>) -> Option<Self> {
        shape.bounding_rect().map(|bbox| Self { idx, bbox })
    }

    /// Get the index of the corresponding MultiPolygon.
    #[inline] pub(super) fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Envelope of a rectangle, for R-tree queries.
#[inline]
pub(super) fn envelope_of(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(rect.min().into(), rect.max().into())
}
