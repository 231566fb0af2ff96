//! Basic geometric types shared by the layout engine and edge routing.

use serde::Serialize;

/// A position in the abstract canvas coordinate space.
///
/// Origin and units are the rendering collaborator's concern; the layout
/// engine only guarantees non-overlapping, deterministic coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Absolute horizontal and vertical displacement to another point.
    pub fn displacement(self, other: Point) -> (f32, f32) {
        ((other.x - self.x).abs(), (other.y - self.y).abs())
    }

    /// Subtracts another point componentwise.
    pub fn sub(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// The dimensions of a diagram node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Componentwise maximum of two sizes.
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_displacement_is_absolute() {
        let a = Point::new(10.0, 40.0);
        let b = Point::new(-20.0, 90.0);

        let (dx, dy) = a.displacement(b);
        assert_approx_eq!(f32, dx, 30.0);
        assert_approx_eq!(f32, dy, 50.0);

        // Symmetric in either direction
        let (dx, dy) = b.displacement(a);
        assert_approx_eq!(f32, dx, 30.0);
        assert_approx_eq!(f32, dy, 50.0);
    }

    #[test]
    fn test_size_max() {
        let a = Size::new(100.0, 40.0);
        let b = Size::new(80.0, 60.0);
        let max = a.max(b);
        assert_approx_eq!(f32, max.width, 100.0);
        assert_approx_eq!(f32, max.height, 60.0);
    }
}
