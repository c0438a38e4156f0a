//! Boundary-exact overlap predicate between two placed shapes.
//!
//! Two placements collide only when their interiors share positive area.
//! Edge or vertex contact has zero intersection area and is legal; the
//! densest packings rely on it. The interior intersection is computed
//! exactly with a polygon overlay and compared against a single explicit
//! area tolerance.

use crate::placement::RigidPlacement;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

/// Returns true if two AABBs intersect, with `slack` expanding the first.
pub fn aabbs_intersect(a: [f64; 4], b: [f64; 4], slack: f64) -> bool {
    a[0] - slack <= b[2] && b[0] <= a[2] + slack && a[1] - slack <= b[3] && b[1] <= a[3] + slack
}

/// Computes the exact interior intersection area of two polygons.
///
/// Returns 0 for disjoint or merely touching polygons.
pub fn overlap_area(a: &[(f64, f64)], b: &[(f64, f64)]) -> f64 {
    let subject: Vec<Vec<[f64; 2]>> = vec![a.iter().map(|&(x, y)| [x, y]).collect()];
    let clip: Vec<[f64; 2]> = b.iter().map(|&(x, y)| [x, y]).collect();

    let shapes = subject.overlay(&[clip], OverlayRule::Intersect, FillRule::NonZero);

    // Outer contours and holes carry opposite winding, so the signed areas
    // cancel correctly within each shape.
    let mut total = 0.0;
    for shape in &shapes {
        for contour in shape {
            total += signed_area(contour);
        }
    }
    total.abs()
}

/// Broad AABB rejection, then exact interior-area comparison.
pub fn interiors_overlap(a: &RigidPlacement, b: &RigidPlacement, tolerance: f64) -> bool {
    if !aabbs_intersect(a.aabb(), b.aabb(), 0.0) {
        return false;
    }
    overlap_area(a.world_polygon(), b.world_polygon()) > tolerance
}

/// Shoelace area of one contour (positive for counter-clockwise winding).
fn signed_area(contour: &[[f64; 2]]) -> f64 {
    let n = contour.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let [x1, y1] = contour[i];
        let [x2, y2] = contour[(i + 1) % n];
        sum += x1 * y2 - x2 * y1;
    }
    sum / 2.0
}
