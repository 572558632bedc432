//! Axis-Aligned Rectangles
//!
//! Every drawable and collidable thing in the game is a rectangle:
//! the character, the weapon, the platform and the menu buttons.

use serde::{Serialize, Deserialize};

use super::vec2::Vec2;

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub w: f64,
    /// Height
    pub h: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle from a position and a size vector.
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Centre point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Point containment, edges inclusive.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges_inclusive() {
        let r = Rect::new(100.0, 100.0, 200.0, 50.0);

        assert!(r.contains(Vec2::new(100.0, 100.0)));
        assert!(r.contains(Vec2::new(300.0, 150.0)));
        assert!(r.contains(Vec2::new(150.0, 120.0)));

        assert!(!r.contains(Vec2::new(99.9, 120.0)));
        assert!(!r.contains(Vec2::new(150.0, 150.1)));
    }

    #[test]
    fn test_edges_and_center() {
        let r = Rect::from_pos_size(Vec2::new(10.0, 20.0), Vec2::new(50.0, 80.0));
        assert_eq!(r.right(), 60.0);
        assert_eq!(r.bottom(), 100.0);
        assert_eq!(r.center(), Vec2::new(35.0, 60.0));
    }
}
