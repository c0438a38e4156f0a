//! Rigid placements of the unit shape and ordered sets of them.

use crate::bounds::BoundsTracker;
use crate::shape::ShapeModel;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A placement's position and rotation. This is the unit the external
/// submission writer consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Center x coordinate.
    pub x: f64,
    /// Center y coordinate.
    pub y: f64,
    /// Rotation in degrees, applied about the shape's local origin.
    pub deg: f64,
}

impl Pose {
    /// Creates a pose.
    pub fn new(x: f64, y: f64, deg: f64) -> Self {
        Self { x, y, deg }
    }
}

/// One rotated, translated copy of the unit shape.
///
/// An immutable value: the world polygon is derived once at construction
/// (rotate about the local origin, then translate) and can never go stale.
/// Changing position or rotation means constructing a new placement.
#[derive(Debug, Clone)]
pub struct RigidPlacement {
    shape: Arc<ShapeModel>,
    pose: Pose,
    world: Vec<(f64, f64)>,
    aabb: [f64; 4],
}

impl RigidPlacement {
    /// Places `shape` with its local origin at `(x, y)`, rotated by `deg`.
    ///
    /// The transform is a pure function of its inputs: identical arguments
    /// always produce a bit-identical world polygon.
    pub fn new(shape: Arc<ShapeModel>, x: f64, y: f64, deg: f64) -> Self {
        let rad = deg.to_radians();
        let (sin_r, cos_r) = rad.sin_cos();

        let mut world = Vec::with_capacity(shape.vertices().len());
        let mut aabb = [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY];

        for &(vx, vy) in shape.vertices() {
            let wx = vx * cos_r - vy * sin_r + x;
            let wy = vx * sin_r + vy * cos_r + y;
            world.push((wx, wy));
            aabb[0] = aabb[0].min(wx);
            aabb[1] = aabb[1].min(wy);
            aabb[2] = aabb[2].max(wx);
            aabb[3] = aabb[3].max(wy);
        }

        Self {
            shape,
            pose: Pose::new(x, y, deg),
            world,
            aabb,
        }
    }

    /// Places `shape` from a [`Pose`].
    pub fn from_pose(shape: Arc<ShapeModel>, pose: Pose) -> Self {
        Self::new(shape, pose.x, pose.y, pose.deg)
    }

    /// Returns the position and rotation.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Returns the shared shape model.
    pub fn shape(&self) -> &Arc<ShapeModel> {
        &self.shape
    }

    /// Returns the world-space vertex ring.
    pub fn world_polygon(&self) -> &[(f64, f64)] {
        &self.world
    }

    /// Returns the world AABB as `[min_x, min_y, max_x, max_y]`.
    pub fn aabb(&self) -> [f64; 4] {
        self.aabb
    }
}

/// An ordered collection of placements, one per shape instance.
///
/// The engine guarantees the no-overlap invariant for every set it returns;
/// transient violations exist only inside the solver's search.
#[derive(Debug, Clone, Default)]
pub struct PlacementSet {
    placements: Vec<RigidPlacement>,
}

impl PlacementSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            placements: Vec::with_capacity(capacity),
        }
    }

    /// Appends a placement.
    pub fn push(&mut self, placement: RigidPlacement) {
        self.placements.push(placement);
    }

    /// Returns the number of placements.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Returns the placement at `index`.
    pub fn get(&self, index: usize) -> Option<&RigidPlacement> {
        self.placements.get(index)
    }

    /// Iterates over the placements in instance order.
    pub fn iter(&self) -> impl Iterator<Item = &RigidPlacement> {
        self.placements.iter()
    }

    /// Returns the placements as a slice.
    pub fn as_slice(&self) -> &[RigidPlacement] {
        &self.placements
    }

    /// Returns the envelope of all world polygons, or `None` for an empty
    /// set.
    pub fn bounds(&self) -> Option<[f64; 4]> {
        BoundsTracker::of(self).bounds()
    }

    /// Returns the bounding square side: the larger of the envelope's width
    /// and height, or 0 for an empty set.
    pub fn side(&self) -> f64 {
        BoundsTracker::of(self).side()
    }

    /// Returns the poses in instance order.
    pub fn poses(&self) -> Vec<Pose> {
        self.placements.iter().map(|p| p.pose()).collect()
    }
}

impl std::ops::Index<usize> for PlacementSet {
    type Output = RigidPlacement;

    fn index(&self, index: usize) -> &Self::Output {
        &self.placements[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tree() -> Arc<ShapeModel> {
        Arc::new(ShapeModel::tree())
    }

    #[test]
    fn test_identity_placement() {
        let shape = tree();
        let p = RigidPlacement::new(shape.clone(), 0.0, 0.0, 0.0);

        assert_eq!(p.world_polygon(), shape.vertices());
        let aabb = p.aabb();
        assert_relative_eq!(aabb[0], -0.35);
        assert_relative_eq!(aabb[3], 0.8);
    }

    #[test]
    fn test_translation() {
        let p = RigidPlacement::new(tree(), 2.0, -1.0, 0.0);
        let aabb = p.aabb();
        assert_relative_eq!(aabb[0], 1.65);
        assert_relative_eq!(aabb[1], -1.2);
        assert_relative_eq!(aabb[2], 2.35);
        assert_relative_eq!(aabb[3], -0.2);
    }

    #[test]
    fn test_half_turn_flips_extents() {
        let p = RigidPlacement::new(tree(), 0.0, 0.0, 180.0);
        let aabb = p.aabb();
        // Upright tree spans y in [-0.2, 0.8]; flipped spans [-0.8, 0.2].
        assert_relative_eq!(aabb[1], -0.8, epsilon = 1e-12);
        assert_relative_eq!(aabb[3], 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_determinism() {
        let shape = tree();
        let a = RigidPlacement::new(shape.clone(), 0.17, -3.2, 37.5);
        let b = RigidPlacement::new(shape, 0.17, -3.2, 37.5);
        assert_eq!(a.world_polygon(), b.world_polygon());
        assert_eq!(a.aabb(), b.aabb());
    }

    #[test]
    fn test_set_bounds_and_side() {
        let shape = tree();
        let mut set = PlacementSet::new();
        assert!(set.bounds().is_none());
        assert_eq!(set.side(), 0.0);

        set.push(RigidPlacement::new(shape.clone(), 0.0, 0.0, 0.0));
        set.push(RigidPlacement::new(shape, 0.355, 0.805, 180.0));

        let bounds = set.bounds().unwrap();
        assert_relative_eq!(bounds[0], -0.35, epsilon = 1e-12);
        assert_relative_eq!(bounds[1], -0.2, epsilon = 1e-12);
        assert_relative_eq!(bounds[2], 0.705, epsilon = 1e-12);
        assert_relative_eq!(bounds[3], 1.005, epsilon = 1e-12);
        assert_relative_eq!(set.side(), 1.205, epsilon = 1e-12);
    }
}
