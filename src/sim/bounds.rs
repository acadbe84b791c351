//! Axis-aligned boxes for placement and hit testing
//!
//! Edges are half-open: two boxes that only touch do not overlap, and a
//! point on the right/bottom edge is outside.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square with the given top-left corner and side length
    pub fn square(top_left: Vec2, size: f32) -> Self {
        Self::new(top_left, top_left + Vec2::splat(size))
    }

    /// Grow (or shrink, for negative `extra`) on every side
    #[inline]
    pub fn inflate(&self, extra: f32) -> Self {
        Self::new(self.min - Vec2::splat(extra), self.max + Vec2::splat(extra))
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// True if the interiors intersect
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.max.x > other.min.x
            && other.max.x > self.min.x
            && self.max.y > other.min.y
            && other.max.y > self.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_touching() {
        let a = Bounds::square(Vec2::ZERO, 10.0);
        let b = Bounds::square(Vec2::new(5.0, 5.0), 10.0);
        let touching = Bounds::square(Vec2::new(10.0, 0.0), 10.0);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&touching));
    }

    #[test]
    fn test_inflate_closes_gap() {
        let a = Bounds::square(Vec2::ZERO, 10.0);
        let b = Bounds::square(Vec2::new(20.0, 0.0), 10.0);
        assert!(!a.inflate(4.0).overlaps(&b.inflate(4.0)));
        assert!(a.inflate(6.0).overlaps(&b.inflate(6.0)));
    }

    #[test]
    fn test_contains_half_open() {
        let a = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0));
        assert!(a.contains(Vec2::new(0.0, 0.0)));
        assert!(a.contains(Vec2::new(9.9, 19.9)));
        assert!(!a.contains(Vec2::new(10.0, 5.0)));
        assert!(!a.contains(Vec2::new(5.0, -0.1)));
        assert_eq!(a.center(), Vec2::new(5.0, 10.0));
    }
}
