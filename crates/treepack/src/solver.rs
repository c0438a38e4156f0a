//! The packing strategy contract and its result type.

use crate::error::Result;
use crate::placement::{PlacementSet, Pose};

/// A completed packing: the placements and the bounding square they fit in.
#[derive(Debug, Clone, Default)]
pub struct Packing {
    /// The placed shape instances, in placement order.
    pub set: PlacementSet,
    /// Side of the smallest axis-aligned bounding square.
    pub side: f64,
}

impl Packing {
    /// Returns the number of placed instances.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns true if nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Returns the poses in instance order, for external consumers.
    pub fn poses(&self) -> Vec<Pose> {
        self.set.poses()
    }
}

/// A solver that packs `n` copies of the unit shape into a minimal square.
///
/// Implementations must be deterministic (identical inputs give bit-identical
/// placements) and must return only sets satisfying the no-overlap invariant,
/// or an error — never a set with fewer than `n` instances.
pub trait PackingStrategy {
    /// Packs exactly `n` instances.
    fn pack(&self, n: usize) -> Result<Packing>;
}
