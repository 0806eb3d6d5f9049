//! Axis-Aligned Rectangles
//!
//! Bodies, attack volumes and zone checks all reduce to AABB tests.
//! Intervals are closed: rectangles that only touch still overlap.

use serde::{Serialize, Deserialize};

use super::vec2::Vec2;

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width (non-negative)
    pub width: f32,
    /// Height (non-negative)
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if two rectangles overlap (closed intervals on both axes).
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Grow the rectangle by `margin` on every side.
    #[inline]
    pub fn inflate(&self, margin: f32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    /// Check if a point lies inside (edges included).
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Approximate circle test: the circle hits if its center lies in this
    /// rectangle inflated by the radius. Corners are treated as square.
    #[inline]
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.inflate(radius).contains_point(center)
    }

    /// Check if the horizontal span lies entirely within `[left, right]`.
    #[inline]
    pub fn within_horizontal(&self, left: f32, right: f32) -> bool {
        self.x >= left && self.right() <= right
    }
}
