use geo::{Area, BooleanOps, BoundingRect, Coord, MultiPolygon, Rect};
use rstar::RTree;

use super::bbox::{envelope_of, BoundingBox};

/// An ordered collection of MultiPolygons with an R-tree over their bounding boxes.
#[derive(Debug, Clone)]
pub(crate) struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<BoundingBox>,
}

impl Geometries {
    /// Construct a Geometries object from a vector of MultiPolygons.
    /// Empty shapes keep their slot but are never returned by queries.
    pub(crate) fn new(shapes: Vec<MultiPolygon<f64>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(i, shape)| BoundingBox::of(i, shape))
                    .collect()
            ),
            shapes,
        }
    }

    /// Get the number of MultiPolygons.
    #[inline] pub(crate) fn len(&self) -> usize { self.shapes.len() }

    /// Check if there are no MultiPolygons.
    #[inline] pub(crate) fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Get a reference to the list of MultiPolygons.
    #[inline] pub(crate) fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }


    /// Indices of the shapes whose bounding box intersects `rect`.
    pub(crate) fn query(&self, rect: &Rect<f64>) -> impl Iterator<Item = usize> + '_ {
        self.rtree.locate_in_envelope_intersecting(&envelope_of(rect))
            .map(|bbox| bbox.idx())
    }

    /// Indices of the shapes that may intersect `shape`, in ascending order.
    pub(crate) fn candidates(&self, shape: &MultiPolygon<f64>) -> Vec<usize> {
        let Some(rect) = shape.bounding_rect() else { return Vec::new() };
        let mut found = self.query(&rect).collect::<Vec<_>>();
        found.sort_unstable();
        found
    }

    /// Compute the bounding rectangle of all MultiPolygons.
    pub(crate) fn bounds(&self) -> Option<Rect<f64>> {
        self.shapes.iter()
            .filter_map(|shape| shape.bounding_rect())
            .reduce(|a, b| Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                }
            ))
    }

    /// Planar (unsigned) area of every MultiPolygon, in squared CRS units.
    pub(crate) fn areas(&self) -> Vec<f64> {
        self.shapes.iter().map(|shape| shape.unsigned_area()).collect()
    }

    /// Compute the union of all MultiPolygons into a single MultiPolygon.
    /// This method may be slow for large numbers of complex polygons.
    pub(crate) fn union(&self) -> Option<MultiPolygon<f64>> {
        self.shapes.iter().cloned().reduce(|a, b| a.union(&b))
    }
}
