//! Geometry primitives shared by the layout engine and the draw batch.

use glam::Vec2;

/// An axis-aligned rectangle described by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and size.
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Creates a rectangle spanning the two given corners.
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            pos: min,
            size: max - min,
        }
    }

    /// Returns the top-left corner.
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    /// Returns the bottom-right corner.
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Returns the center point.
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Returns `true` if the point lies within the rectangle, edges included.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.pos.x
            && point.x <= self.pos.x + self.size.x
            && point.y >= self.pos.y
            && point.y <= self.pos.y + self.size.y
    }

    /// Returns `true` if both dimensions are strictly positive.
    pub fn is_positive(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0
    }

    /// Returns the rectangle inset by `amount` on every side.
    pub fn shrunk(&self, amount: f32) -> Rect {
        Rect {
            pos: self.pos + Vec2::splat(amount),
            size: self.size - Vec2::splat(amount * 2.0),
        }
    }

    /// Returns the rectangle grown by `amount` on every side.
    pub fn expanded(&self, amount: f32) -> Rect {
        self.shrunk(-amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn test_contains_is_edge_inclusive() {
        let rect = Rect::new(vec2(10.0, 20.0), vec2(30.0, 40.0));
        assert!(rect.contains(vec2(10.0, 20.0)));
        assert!(rect.contains(vec2(40.0, 60.0)));
        assert!(rect.contains(vec2(25.0, 35.0)));
        assert!(!rect.contains(vec2(9.9, 35.0)));
        assert!(!rect.contains(vec2(25.0, 60.1)));
    }

    #[test]
    fn test_shrunk_and_degenerate() {
        let rect = Rect::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
        let inner = rect.shrunk(2.0);
        assert_eq!(inner, Rect::new(vec2(2.0, 2.0), vec2(6.0, 6.0)));
        assert!(inner.is_positive());
        assert!(!rect.shrunk(5.0).is_positive());
        assert_eq!(rect.shrunk(2.0).expanded(2.0), rect);
    }
}
