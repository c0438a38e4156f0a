//! Validation and the competition metric.
//!
//! A score is only meaningful for a set that satisfies the no-overlap
//! invariant, so scoring always re-verifies the entire set pairwise first
//! and surfaces a failure instead of returning a number.

use crate::error::{Error, Result};
use crate::overlap::overlap_area;
use crate::placement::PlacementSet;
use crate::spatial_index::SpatialIndex;

/// Placement centers accepted by the official verifier must lie within
/// this many units of the origin on both axes.
pub const COORDINATE_LIMIT: f64 = 100.0;

/// Validates placement sets and computes `side^2 / n`.
#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    tolerance: f64,
}

impl Scorer {
    /// Creates a scorer with the default overlap tolerance.
    pub fn new() -> Self {
        Self { tolerance: 1e-12 }
    }

    /// Sets the interior-overlap area tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Re-verifies the no-overlap invariant over the entire set, pairwise,
    /// and the coordinate limits. Reports the first offending placement.
    pub fn validate(&self, set: &PlacementSet) -> Result<()> {
        for (i, placement) in set.iter().enumerate() {
            let pose = placement.pose();
            if pose.x.abs() > COORDINATE_LIMIT || pose.y.abs() > COORDINATE_LIMIT {
                return Err(Error::OutOfBounds {
                    index: i,
                    x: pose.x,
                    y: pose.y,
                });
            }
        }

        let index = SpatialIndex::from_set(set);
        for (i, placement) in set.iter().enumerate() {
            for j in index.candidates(placement.aabb(), 0.0) {
                // Each pair once, and never a placement against itself.
                if j <= i {
                    continue;
                }
                let area = overlap_area(placement.world_polygon(), set[j].world_polygon());
                if area > self.tolerance {
                    return Err(Error::ValidationFailure {
                        first: i,
                        second: j,
                        area,
                    });
                }
            }
        }
        Ok(())
    }

    /// Validates, then returns `side^2 / n` (0 for an empty set).
    pub fn score(&self, set: &PlacementSet) -> Result<f64> {
        self.validate(set)?;
        if set.is_empty() {
            return Ok(0.0);
        }
        let side = set.side();
        Ok(side * side / set.len() as f64)
    }

    /// The competition total: `side^2 / n` summed over all groups. Any
    /// invalid group fails the whole submission.
    pub fn score_groups(&self, groups: &[PlacementSet]) -> Result<f64> {
        let mut total = 0.0;
        for group in groups {
            total += self.score(group)?;
        }
        Ok(total)
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}
