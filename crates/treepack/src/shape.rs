//! The unit shape: an immutable simple polygon in local coordinates.

use crate::error::{Error, Result};
use geo::{Area, Centroid, Coord, LineString, Polygon as GeoPolygon};
use robust::{orient2d, Coord as RCoord};

/// Vertices of the unit tree shape, clockwise from the tip.
///
/// Tier widths 0.25 / 0.4 / 0.7 at y = 0.5 / 0.25 / 0.0, trunk 0.15 x 0.2.
const TREE_VERTICES: [(f64, f64); 15] = [
    (0.0, 0.8),
    (0.125, 0.5),
    (0.0625, 0.5),
    (0.2, 0.25),
    (0.1, 0.25),
    (0.35, 0.0),
    (0.075, 0.0),
    (0.075, -0.2),
    (-0.075, -0.2),
    (-0.075, 0.0),
    (-0.35, 0.0),
    (-0.1, 0.25),
    (-0.2, 0.25),
    (-0.0625, 0.5),
    (-0.125, 0.5),
];

/// An immutable simple polygon describing the shape being packed.
///
/// Constructed once, validated eagerly, and shared by reference (via
/// [`std::sync::Arc`]) across all placements. Vertex order (clockwise or
/// counter-clockwise) is preserved as given.
#[derive(Debug, Clone)]
pub struct ShapeModel {
    vertices: Vec<(f64, f64)>,
    area: f64,
    centroid: (f64, f64),
    aabb: [f64; 4],
}

impl ShapeModel {
    /// Creates a shape from an ordered, closed vertex ring.
    ///
    /// Fails fast on degenerate input: fewer than three vertices, zero area,
    /// or a self-intersecting ring.
    pub fn new(vertices: Vec<(f64, f64)>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::InvalidShape(format!(
                "polygon must have at least 3 vertices, got {}",
                vertices.len()
            )));
        }

        let poly = to_geo_polygon(&vertices);
        let area = poly.unsigned_area();
        if area <= 0.0 {
            return Err(Error::InvalidShape("polygon has zero area".to_string()));
        }

        if let Some((i, j)) = find_self_intersection(&vertices) {
            return Err(Error::InvalidShape(format!(
                "polygon edges {i} and {j} cross"
            )));
        }

        let centroid = poly
            .centroid()
            .map(|c| (c.x(), c.y()))
            .unwrap_or((0.0, 0.0));

        let mut aabb = [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY];
        for &(x, y) in &vertices {
            aabb[0] = aabb[0].min(x);
            aabb[1] = aabb[1].min(y);
            aabb[2] = aabb[2].max(x);
            aabb[3] = aabb[3].max(y);
        }

        Ok(Self {
            vertices,
            area,
            centroid,
            aabb,
        })
    }

    /// The calibrated unit tree shape that the default [`LatticeSpec`]
    /// constants were measured against.
    ///
    /// [`LatticeSpec`]: crate::lattice::LatticeSpec
    pub fn tree() -> Self {
        // The constants form a valid simple polygon; validation cannot fail.
        Self::new(TREE_VERTICES.to_vec()).expect("tree constants are a valid polygon")
    }

    /// Returns the local-space vertex ring.
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Returns the polygon area.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Returns the area centroid in local coordinates.
    pub fn centroid(&self) -> (f64, f64) {
        self.centroid
    }

    /// Returns the local AABB as `[min_x, min_y, max_x, max_y]`.
    pub fn aabb(&self) -> [f64; 4] {
        self.aabb
    }

    /// Computes the AABB of the shape rotated by `deg` about the local
    /// origin.
    pub fn aabb_at_rotation(&self, deg: f64) -> [f64; 4] {
        if deg == 0.0 {
            return self.aabb;
        }

        let rad = deg.to_radians();
        let (sin_r, cos_r) = rad.sin_cos();

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for &(x, y) in &self.vertices {
            let rx = x * cos_r - y * sin_r;
            let ry = x * sin_r + y * cos_r;
            min_x = min_x.min(rx);
            min_y = min_y.min(ry);
            max_x = max_x.max(rx);
            max_y = max_y.max(ry);
        }

        [min_x, min_y, max_x, max_y]
    }

    /// Returns the width and height of the AABB at the given rotation.
    pub fn dimensions_at_rotation(&self, deg: f64) -> (f64, f64) {
        let aabb = self.aabb_at_rotation(deg);
        (aabb[2] - aabb[0], aabb[3] - aabb[1])
    }

    /// Converts to a `geo` polygon.
    pub fn to_geo_polygon(&self) -> GeoPolygon<f64> {
        to_geo_polygon(&self.vertices)
    }
}

fn to_geo_polygon(vertices: &[(f64, f64)]) -> GeoPolygon<f64> {
    let exterior = LineString::from(
        vertices
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect::<Vec<_>>(),
    );
    GeoPolygon::new(exterior, vec![])
}

/// Returns the first pair of non-adjacent edges that properly cross, if any.
fn find_self_intersection(vertices: &[(f64, f64)]) -> Option<(usize, usize)> {
    let n = vertices.len();
    for i in 0..n {
        for j in (i + 2)..n {
            // Skip adjacent edges, including the wrap-around pair.
            if i == 0 && j == n - 1 {
                continue;
            }
            let (a1, a2) = (vertices[i], vertices[(i + 1) % n]);
            let (b1, b2) = (vertices[j], vertices[(j + 1) % n]);
            if segments_cross(a1, a2, b1, b2) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Proper crossing test using the robust orientation predicate.
fn segments_cross(a1: (f64, f64), a2: (f64, f64), b1: (f64, f64), b2: (f64, f64)) -> bool {
    let d1 = orientation(a1, a2, b1);
    let d2 = orientation(a1, a2, b2);
    let d3 = orientation(b1, b2, a1);
    let d4 = orientation(b1, b2, a2);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

fn orientation(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    orient2d(
        RCoord { x: a.0, y: a.1 },
        RCoord { x: b.0, y: b.1 },
        RCoord { x: c.0, y: c.1 },
    )
}
