//! R-tree nearest-vertex index over route points.
//!
//! Built once per evaluation with a bulk load and queried read-only for
//! every track point, so it can be shared across worker threads.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::error::{EvalError, Result};
use crate::PlanarPoint;

/// A route vertex with its position in the route for R-tree queries
#[derive(Debug, Clone, Copy)]
pub struct IndexedVertex {
    pub idx: usize,
    pub x: f64,
    pub y: f64,
}

impl RTreeObject for IndexedVertex {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for IndexedVertex {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Nearest-vertex index over a route's planar points.
#[derive(Debug)]
pub struct RouteIndex {
    tree: RTree<IndexedVertex>,
}

impl RouteIndex {
    /// Bulk-load the index. Fails with [`EvalError::EmptyRoute`] on zero points.
    pub fn build(points: &[PlanarPoint]) -> Result<Self> {
        if points.is_empty() {
            return Err(EvalError::EmptyRoute { point_count: 0 });
        }
        let indexed: Vec<IndexedVertex> = points
            .iter()
            .enumerate()
            .map(|(idx, p)| IndexedVertex { idx, x: p.x, y: p.y })
            .collect();
        Ok(Self {
            tree: RTree::bulk_load(indexed),
        })
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest vertex index and its Euclidean distance from `query`.
    ///
    /// Vertices at exactly equal distance resolve to the lowest index.
    /// `build` never produces an empty index, so there is always an answer.
    pub fn nearest(&self, query: &PlanarPoint) -> (usize, f64) {
        let mut best = (usize::MAX, f64::INFINITY);
        // Candidates arrive in ascending distance order
        for (vertex, d2) in self
            .tree
            .nearest_neighbor_iter_with_distance_2(&[query.x, query.y])
        {
            if d2 > best.1 {
                break;
            }
            if d2 < best.1 || vertex.idx < best.0 {
                best = (vertex.idx, d2);
            }
        }
        (best.0, best.1.sqrt())
    }
}
