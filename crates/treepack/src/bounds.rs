//! Running axis-aligned envelope over a set of placements.

use crate::placement::PlacementSet;

/// Accumulates the axis-aligned envelope of a growing placement set.
///
/// The bounding square is always derived from the current contents; it is
/// never stored independently of the set it describes.
#[derive(Debug, Clone, Copy)]
pub struct BoundsTracker {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl BoundsTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Computes the envelope of a whole placement set.
    pub fn of(set: &PlacementSet) -> Self {
        let mut tracker = Self::new();
        for placement in set.iter() {
            tracker.insert(placement.aabb());
        }
        tracker
    }

    /// Extends the envelope with one AABB.
    pub fn insert(&mut self, aabb: [f64; 4]) {
        self.min_x = self.min_x.min(aabb[0]);
        self.min_y = self.min_y.min(aabb[1]);
        self.max_x = self.max_x.max(aabb[2]);
        self.max_y = self.max_y.max(aabb[3]);
    }

    /// Merges another tracker's envelope into this one.
    pub fn merge(&mut self, other: &BoundsTracker) {
        if let Some(bounds) = other.bounds() {
            self.insert(bounds);
        }
    }

    /// Returns true if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    /// Returns `[min_x, min_y, max_x, max_y]`, or `None` when empty.
    pub fn bounds(&self) -> Option<[f64; 4]> {
        if self.is_empty() {
            None
        } else {
            Some([self.min_x, self.min_y, self.max_x, self.max_y])
        }
    }

    /// Returns the envelope width (0 when empty).
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    /// Returns the envelope height (0 when empty).
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Returns the bounding square side: `max(width, height)`.
    pub fn side(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Returns the center of the envelope, or `None` when empty.
    pub fn center(&self) -> Option<(f64, f64)> {
        self.bounds()
            .map(|b| ((b[0] + b[2]) / 2.0, (b[1] + b[3]) / 2.0))
    }
}

impl Default for BoundsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty() {
        let tracker = BoundsTracker::new();
        assert!(tracker.is_empty());
        assert!(tracker.bounds().is_none());
        assert_eq!(tracker.side(), 0.0);
        assert!(tracker.center().is_none());
    }

    #[test]
    fn test_insert_and_side() {
        let mut tracker = BoundsTracker::new();
        tracker.insert([0.0, 0.0, 1.0, 2.0]);
        assert_relative_eq!(tracker.width(), 1.0);
        assert_relative_eq!(tracker.height(), 2.0);
        assert_relative_eq!(tracker.side(), 2.0);

        tracker.insert([-3.0, 0.5, 0.5, 1.0]);
        assert_relative_eq!(tracker.width(), 4.0);
        assert_relative_eq!(tracker.side(), 4.0);
        assert_eq!(tracker.bounds(), Some([-3.0, 0.0, 1.0, 2.0]));
    }

    #[test]
    fn test_merge() {
        let mut a = BoundsTracker::new();
        a.insert([0.0, 0.0, 1.0, 1.0]);

        let mut b = BoundsTracker::new();
        b.insert([2.0, -1.0, 3.0, 0.5]);

        a.merge(&b);
        assert_eq!(a.bounds(), Some([0.0, -1.0, 3.0, 1.0]));

        // Merging an empty tracker changes nothing.
        a.merge(&BoundsTracker::new());
        assert_eq!(a.bounds(), Some([0.0, -1.0, 3.0, 1.0]));
    }

    #[test]
    fn test_center() {
        let mut tracker = BoundsTracker::new();
        tracker.insert([-1.0, 0.0, 3.0, 2.0]);
        let (cx, cy) = tracker.center().unwrap();
        assert_relative_eq!(cx, 1.0);
        assert_relative_eq!(cy, 1.0);
    }
}
