//! Broad-phase spatial index over placed shapes using an R*-tree.
//!
//! Candidate queries return a superset of the placements whose bounding
//! boxes intersect the query box; callers narrow the result with the exact
//! overlap predicate. The index supports incremental appends, which is how
//! the constructive solver grows it one placement at a time.

use crate::placement::PlacementSet;
use rstar::{RTree, RTreeObject, AABB};

/// An indexed placement: its instance index and world AABB.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    /// Index of the placement in its set.
    pub index: usize,
    /// World AABB as `[min_x, min_y, max_x, max_y]`.
    pub aabb: [f64; 4],
}

impl SpatialEntry {
    /// Creates an entry.
    pub fn new(index: usize, aabb: [f64; 4]) -> Self {
        Self { index, aabb }
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.aabb[0], self.aabb[1]], [self.aabb[2], self.aabb[3]])
    }
}

/// R*-tree broad phase over a set of placements.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-loads an index from prepared entries.
    pub fn with_entries(entries: Vec<SpatialEntry>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Bulk-loads an index over a whole placement set.
    pub fn from_set(set: &PlacementSet) -> Self {
        let entries = set
            .iter()
            .enumerate()
            .map(|(i, p)| SpatialEntry::new(i, p.aabb()))
            .collect();
        Self::with_entries(entries)
    }

    /// Appends one placement's AABB.
    pub fn insert(&mut self, index: usize, aabb: [f64; 4]) {
        self.tree.insert(SpatialEntry::new(index, aabb));
    }

    /// Returns the number of indexed placements.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Returns all entries whose AABB intersects the query box.
    pub fn query_aabb(&self, min: [f64; 2], max: [f64; 2]) -> Vec<&SpatialEntry> {
        let envelope = AABB::from_corners(min, max);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .collect()
    }

    /// Returns the indices of placements whose AABB intersects `aabb`
    /// expanded by `margin` on every side.
    pub fn candidates(&self, aabb: [f64; 4], margin: f64) -> Vec<usize> {
        self.query_aabb(
            [aabb[0] - margin, aabb[1] - margin],
            [aabb[2] + margin, aabb[3] + margin],
        )
        .iter()
        .map(|entry| entry.index)
        .collect()
    }
}
