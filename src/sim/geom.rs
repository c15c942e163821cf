//! Axis-aligned rectangles and hitboxes
//!
//! Screen space: origin top-left, x grows right, y grows down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
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

    /// Rectangle of the given size centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
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

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    #[inline]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    #[inline]
    pub fn mid_top(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y)
    }

    pub fn set_mid_bottom(&mut self, point: Vec2) {
        self.x = point.x - self.w / 2.0;
        self.y = point.y - self.h;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Strict overlap test; rectangles that only share an edge do not collide,
    /// and empty rectangles never collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.w <= 0.0 || self.h <= 0.0 || other.w <= 0.0 || other.h <= 0.0 {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Point containment (left/top edges inclusive, right/bottom exclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }
}

/// Collision shape of an entity
///
/// Composite entities (the boss) expose several rectangles that are tested
/// individually but belong to one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hitbox<'a> {
    Single(Rect),
    Composite(&'a [Rect]),
}

impl Hitbox<'_> {
    /// All rectangles of this hitbox
    pub fn rects(&self) -> &[Rect] {
        match self {
            Hitbox::Single(rect) => std::slice::from_ref(rect),
            Hitbox::Composite(rects) => rects,
        }
    }

    /// True if any rectangle of this hitbox overlaps `rect`
    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.rects().iter().any(|r| r.overlaps(rect))
    }

    /// Centre of the bounding box of all rectangles
    pub fn center(&self) -> Vec2 {
        let rects = self.rects();
        let Some(first) = rects.first() else {
            return Vec2::ZERO;
        };
        let (mut min, mut max) = (first.top_left(), first.top_left() + first.size());
        for r in &rects[1..] {
            min = min.min(r.top_left());
            max = max.max(r.top_left() + r.size());
        }
        (min + max) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let inside = Rect::new(9.0, 9.0, 5.0, 5.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_empty_rect_never_overlaps() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let empty = Rect::new(5.0, 5.0, 0.0, 3.0);
        assert!(!a.overlaps(&empty));
    }

    #[test]
    fn test_anchor_setters() {
        let mut r = Rect::new(0.0, 0.0, 20.0, 10.0);
        r.set_center(Vec2::new(50.0, 50.0));
        assert_eq!(r.top_left(), Vec2::new(40.0, 45.0));
        r.set_mid_bottom(Vec2::new(100.0, 200.0));
        assert_eq!(r.top_left(), Vec2::new(90.0, 190.0));
        assert_eq!(r.mid_top(), Vec2::new(100.0, 190.0));
    }

    #[test]
    fn test_composite_hitbox() {
        let rects = [Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(30.0, 30.0, 10.0, 10.0)];
        let hb = Hitbox::Composite(&rects);
        assert!(hb.overlaps(&Rect::new(35.0, 35.0, 2.0, 2.0)));
        assert!(!hb.overlaps(&Rect::new(15.0, 15.0, 5.0, 5.0)));
        assert_eq!(hb.center(), Vec2::new(20.0, 20.0));
        assert_eq!(Hitbox::Single(rects[0]).rects().len(), 1);
    }
}
