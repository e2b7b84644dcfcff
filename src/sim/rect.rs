//! Axis-aligned rectangle geometry for platforms, enemies and the player
//!
//! Screen space: x grows to the right, y grows downward, and a rectangle's
//! position is its top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rects_overlap;

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle with top-left corner at `pos`
    pub fn at(pos: Vec2, w: f32, h: f32) -> Self {
        Self::new(pos.x, pos.y, w, h)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap: rectangles that merely share an edge do not overlap,
    /// and a rectangle with no area overlaps nothing
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_degenerate()
            && !other.is_degenerate()
            && rects_overlap(self.x, self.y, self.w, self.h, other.x, other.y, other.w, other.h)
    }

    /// Zero or negative width or height
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Shrink every side by `amount`
    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.w - 2.0 * amount).max(0.0),
            (self.h - 2.0 * amount).max(0.0),
        )
    }

    /// Horizontal span covered by this rectangle contains `x`
    pub fn spans_x(&self, x: f32) -> bool {
        x >= self.left() && x <= self.right()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let floor = Rect::new(0.0, 100.0, 200.0, 20.0);
        let standing = Rect::new(50.0, 56.0, 28.0, 44.0);
        assert!(!standing.overlaps(&floor));

        let sunk = Rect::new(50.0, 56.5, 28.0, 44.0);
        assert!(sunk.overlaps(&floor));
        assert!(floor.overlaps(&sunk));
    }

    #[test]
    fn test_inset_never_goes_negative() {
        let r = Rect::new(0.0, 0.0, 6.0, 100.0);
        let inner = r.inset(4.0);
        assert_eq!(inner.x, 4.0);
        assert_eq!(inner.w, 0.0);
        assert_eq!(inner.h, 92.0);
        // A zero-width rectangle overlaps nothing
        assert!(inner.is_degenerate());
        assert!(!inner.overlaps(&Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_degenerate_rects_overlap_nothing() {
        let big = Rect::new(0.0, 0.0, 100.0, 100.0);
        let flat = Rect::new(10.0, 10.0, 50.0, 0.0);
        let inverted = Rect::new(10.0, 10.0, -5.0, 20.0);
        assert!(!flat.overlaps(&big));
        assert!(!big.overlaps(&flat));
        assert!(!inverted.overlaps(&big));
        assert!(Rect::new(10.0, 10.0, 1.0, 1.0).overlaps(&big));
    }
}
