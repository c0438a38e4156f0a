//! Global-rotation refinement of a completed packing.
//!
//! Rotating every placement by the same angle about a shared pivot leaves
//! all pairwise geometry unchanged, so a valid set stays valid for any
//! angle; only the axis-aligned bounds move. The refiner sweeps [0, 180)
//! for the angle minimizing the bounding square, then polishes locally.

use crate::bounds::BoundsTracker;
use crate::config::PackConfig;
use crate::placement::{PlacementSet, RigidPlacement};

/// The outcome of a refinement pass.
#[derive(Debug, Clone)]
pub struct Refinement {
    /// The rotated set (or the input set if no angle improved it).
    pub set: PlacementSet,
    /// Bounding square side of `set`.
    pub side: f64,
    /// The global rotation applied, in degrees (0 if unchanged).
    pub angle_deg: f64,
}

/// Searches for the global rotation minimizing the bounding square.
#[derive(Debug, Clone, Copy)]
pub struct RotationRefiner {
    coarse_step_deg: f64,
    fine_step_deg: f64,
    fine_window_deg: f64,
}

impl RotationRefiner {
    /// Creates a refiner with the default sweep resolution.
    pub fn new() -> Self {
        Self::from_config(&PackConfig::default())
    }

    /// Creates a refiner from a configuration.
    pub fn from_config(config: &PackConfig) -> Self {
        Self {
            coarse_step_deg: config.coarse_step_deg,
            fine_step_deg: config.fine_step_deg,
            fine_window_deg: config.fine_window_deg,
        }
    }

    /// Finds the best global rotation for `set` and applies it.
    ///
    /// Each placement's new pose is derived by rotating its center about the
    /// pivot and adding the angle to its own rotation — never by reading
    /// back rotated polygons, which would compound float error. The reported
    /// side is never greater than the input side.
    pub fn refine(&self, set: &PlacementSet) -> Refinement {
        let tracker = BoundsTracker::of(set);
        let Some(pivot) = tracker.center() else {
            return Refinement {
                set: set.clone(),
                side: 0.0,
                angle_deg: 0.0,
            };
        };
        let side0 = tracker.side();

        // Pool every world vertex once; each candidate angle is a single
        // rotate-and-bound pass over the pool.
        let vertices: Vec<(f64, f64)> = set
            .iter()
            .flat_map(|p| p.world_polygon().iter().copied())
            .collect();

        let mut best_angle = 0.0;
        let mut best_side = side0;

        let mut angle = self.coarse_step_deg;
        while angle < 180.0 {
            let side = rotated_side(&vertices, pivot, angle);
            if side < best_side {
                best_side = side;
                best_angle = angle;
            }
            angle += self.coarse_step_deg;
        }

        if self.fine_step_deg > 0.0 && self.fine_window_deg > 0.0 {
            let center = best_angle;
            let mut angle = center - self.fine_window_deg;
            while angle <= center + self.fine_window_deg {
                if angle != center {
                    let side = rotated_side(&vertices, pivot, angle);
                    if side < best_side {
                        best_side = side;
                        best_angle = angle;
                    }
                }
                angle += self.fine_step_deg;
            }
        }

        if best_angle == 0.0 {
            return Refinement {
                set: set.clone(),
                side: side0,
                angle_deg: 0.0,
            };
        }

        let rad = best_angle.to_radians();
        let (sin_a, cos_a) = rad.sin_cos();
        let mut rotated = PlacementSet::with_capacity(set.len());
        for placement in set.iter() {
            let pose = placement.pose();
            let dx = pose.x - pivot.0;
            let dy = pose.y - pivot.1;
            rotated.push(RigidPlacement::new(
                placement.shape().clone(),
                pivot.0 + dx * cos_a - dy * sin_a,
                pivot.1 + dx * sin_a + dy * cos_a,
                pose.deg + best_angle,
            ));
        }

        // The rebuilt polygons can land a few ulps off the swept estimate;
        // keep the original set if the rebuild does not actually win.
        let side = rotated.side();
        if side > side0 {
            return Refinement {
                set: set.clone(),
                side: side0,
                angle_deg: 0.0,
            };
        }

        log::debug!("global rotation {best_angle:.1} deg: side {side0:.6} -> {side:.6}");
        Refinement {
            set: rotated,
            side,
            angle_deg: best_angle,
        }
    }
}

impl Default for RotationRefiner {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounding square side of the vertex pool rotated by `deg` about `pivot`.
fn rotated_side(vertices: &[(f64, f64)], pivot: (f64, f64), deg: f64) -> f64 {
    let rad = deg.to_radians();
    let (sin_a, cos_a) = rad.sin_cos();

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &(x, y) in vertices {
        let dx = x - pivot.0;
        let dy = y - pivot.1;
        let rx = pivot.0 + dx * cos_a - dy * sin_a;
        let ry = pivot.1 + dx * sin_a + dy * cos_a;
        min_x = min_x.min(rx);
        min_y = min_y.min(ry);
        max_x = max_x.max(rx);
        max_y = max_y.max(ry);
    }

    (max_x - min_x).max(max_y - min_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeModel;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn single_upright() -> PlacementSet {
        let mut set = PlacementSet::new();
        set.push(RigidPlacement::new(
            Arc::new(ShapeModel::tree()),
            0.0,
            0.0,
            0.0,
        ));
        set
    }

    #[test]
    fn test_empty_set() {
        let refined = RotationRefiner::new().refine(&PlacementSet::new());
        assert!(refined.set.is_empty());
        assert_eq!(refined.side, 0.0);
        assert_eq!(refined.angle_deg, 0.0);
    }

    #[test]
    fn test_never_increases_side() {
        let set = single_upright();
        let side0 = set.side();

        let refined = RotationRefiner::new().refine(&set);
        assert!(refined.side <= side0 + 1e-12);
        assert_relative_eq!(refined.side, refined.set.side(), epsilon = 1e-12);
    }

    #[test]
    fn test_single_shape_improves() {
        // An upright lone tree has a 0.7 x 1.0 box; some rotation beats it.
        let refined = RotationRefiner::new().refine(&single_upright());
        assert!(refined.side < 1.0);
        assert!(refined.angle_deg != 0.0);
    }

    #[test]
    fn test_rotation_applied_to_poses() {
        let set = single_upright();
        let refined = RotationRefiner::new().refine(&set);
        // One placement pivoting about its own box center keeps its rotation
        // delta equal to the global angle.
        assert_relative_eq!(refined.set[0].pose().deg, refined.angle_deg);
    }

    #[test]
    fn test_square_arrangement_unchanged() {
        // Four half-turn-symmetric bricks in a square: the axis-aligned
        // arrangement is already near-optimal and must not get worse.
        let shape = Arc::new(ShapeModel::tree());
        let mut set = PlacementSet::new();
        for &(x, y) in &[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (2.0, 2.0)] {
            set.push(RigidPlacement::new(shape.clone(), x, y, 0.0));
        }
        let side0 = set.side();

        let refined = RotationRefiner::new().refine(&set);
        assert!(refined.side <= side0 + 1e-12);
    }
}
