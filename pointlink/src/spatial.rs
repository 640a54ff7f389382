//! Spatial index over the points of a point set.
//!
//! Points are stored as degenerate envelopes in fixed-point degrees inside an
//! R-tree, which answers "which points fall in this rectangle" when selecting
//! points whose egress costs need rebuilding near a changed stop or edge.

use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};

use crate::coord::FixedCoord;
use crate::point_set::PointSource;

type IndexedPoint = GeomWithData<[i32; 2], usize>;

/// Immutable range-query index of point indices by fixed-point coordinate.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Index every point of `source`, keyed by its position in the set.
    pub fn build(source: &dyn PointSource) -> Self {
        let entries: Vec<IndexedPoint> = (0..source.feature_count())
            .map(|index| GeomWithData::new(source.fixed_coordinate(index).to_array(), index))
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Indices of all points inside the envelope spanned by two corners,
    /// boundaries included, in ascending order.
    pub fn query(&self, corner_a: FixedCoord, corner_b: FixedCoord) -> Vec<usize> {
        let envelope = AABB::from_corners(corner_a.to_array(), corner_b.to_array());
        let mut found: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|entry| entry.data)
            .collect();
        found.sort_unstable();
        found
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("points", &self.len())
            .finish()
    }
}
