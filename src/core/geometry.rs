//! # Geometry
//!
//! Plain value types for layout math. Everything is expressed in abstract
//! points (`f64`); the renderer decides what a point is (a terminal cell in
//! the demo adapter).
//!
//! Sizes never go negative: constructors and setters clamp to zero so a
//! malformed frame degrades to an empty one instead of poisoning later math.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    /// Create a size, clamping negative (or NaN) dimensions to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
        }
    }
}

/// Insets applied to each edge of a rectangle. Negative values inflate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets { top: 0.0, left: 0.0, bottom: 0.0, right: 0.0 };

    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self { top, left, bottom, right }
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// The same insets with every edge negated (inset ↔ outset).
    pub fn inverted(&self) -> Self {
        Self::new(-self.top, -self.left, -self.bottom, -self.right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect { origin: Point::ZERO, size: Size::ZERO };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }

    pub fn y(&self) -> f64 {
        self.origin.y
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Shrink the rect by `insets`. Negative insets grow it.
    pub fn inset_by(&self, insets: EdgeInsets) -> Self {
        Self::new(
            self.origin.x + insets.left,
            self.origin.y + insets.top,
            self.size.width - insets.horizontal(),
            self.size.height - insets.vertical(),
        )
    }

    pub fn with_height(&self, height: f64) -> Self {
        Self::new(self.origin.x, self.origin.y, self.size.width, height)
    }

    pub fn with_width(&self, width: f64) -> Self {
        Self::new(self.origin.x, self.origin.y, width, self.size.height)
    }

    pub fn with_origin(&self, origin: Point) -> Self {
        Self { origin, size: self.size }
    }
}

fn clamp_dimension(value: f64) -> f64 {
    if value > 0.0 { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_sizes_clamp_to_zero() {
        let rect = Rect::new(5.0, 5.0, -10.0, -3.0);
        assert_eq!(rect.size, Size::ZERO);
        assert_eq!(rect.origin, Point::new(5.0, 5.0));
    }

    #[test]
    fn nan_clamps_to_zero() {
        assert_eq!(Size::new(f64::NAN, 2.0), Size::new(0.0, 2.0));
    }

    #[test]
    fn inset_by_negative_insets_inflates() {
        let rect = Rect::new(10.0, 10.0, 100.0, 20.0);
        let grown = rect.inset_by(EdgeInsets::new(6.0, 8.0, 6.0, 8.0).inverted());
        assert_eq!(grown, Rect::new(2.0, 4.0, 116.0, 32.0));
    }

    #[test]
    fn inset_by_larger_than_rect_collapses() {
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        let shrunk = rect.inset_by(EdgeInsets::new(3.0, 3.0, 3.0, 3.0));
        assert_eq!(shrunk.size, Size::ZERO);
    }

    #[test]
    fn center_tracks_origin_and_size() {
        let rect = Rect::new(0.0, 100.0, 320.0, 44.0);
        assert_eq!(rect.center(), Point::new(160.0, 122.0));
    }
}
