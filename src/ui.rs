//! Presentation widgets: buttons, the volume slider and health bars
//!
//! Widgets never own input devices. Engines feed them the pointer position
//! and click state for the current frame.

use glam::Vec2;

use crate::sim::geom::Rect;

/// A clickable rectangle with a hover latch
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    rect: Rect,
    label: &'static str,
    hovered: bool,
    visible: bool,
}

impl Button {
    pub fn new(rect: Rect, label: &'static str) -> Self {
        Self {
            rect,
            label,
            hovered: false,
            visible: true,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.hovered = false;
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.visible && self.rect.contains_point(point)
    }

    /// Track the pointer. Returns true only on the frame the pointer enters.
    pub fn update_hover(&mut self, pointer: Option<Vec2>) -> bool {
        let inside = pointer.is_some_and(|p| self.contains(p));
        let entered = inside && !self.hovered;
        self.hovered = inside;
        entered
    }

    /// A click landed on the button this frame
    pub fn is_clicked(&self, pointer: Option<Vec2>, click: bool) -> bool {
        click && pointer.is_some_and(|p| self.contains(p))
    }
}

/// Horizontal slider reporting a value in 0..=100
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    rect: Rect,
    /// Handle x position, always inside `rect`
    handle_x: f32,
}

impl Slider {
    /// Snap to 0 below this fraction
    const LOW_SNAP: f32 = 0.05;
    /// Snap to full above this fraction
    const HIGH_SNAP: f32 = 0.98;

    pub fn new(rect: Rect, initial: f32) -> Self {
        let mut slider = Self {
            rect,
            handle_x: rect.left(),
        };
        slider.set_fraction(initial);
        slider
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn handle_x(&self) -> f32 {
        self.handle_x
    }

    /// Move the handle to `x`, clamped to the track
    pub fn move_to(&mut self, x: f32) {
        self.handle_x = x.clamp(self.rect.left(), self.rect.right());
    }

    pub fn set_fraction(&mut self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        self.handle_x = self.rect.left() + fraction * self.rect.w;
    }

    /// Drag the handle while the button is held over the track.
    /// Returns true when the handle moved.
    pub fn drag(&mut self, pointer: Option<Vec2>, pressed: bool) -> bool {
        match pointer {
            Some(p) if pressed && self.rect.contains_point(p) => {
                let before = self.handle_x;
                self.move_to(p.x);
                before != self.handle_x
            }
            _ => false,
        }
    }

    /// Current value in 0..=100, snapped at both ends
    pub fn value(&self) -> f32 {
        if self.rect.w <= 0.0 {
            return 0.0;
        }
        let scaled = (self.handle_x - self.rect.left()) / self.rect.w;
        if scaled < Self::LOW_SNAP {
            0.0
        } else if scaled > Self::HIGH_SNAP {
            100.0
        } else {
            scaled * 100.0
        }
    }
}

/// Health bar fill state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    width: f32,
    filled: f32,
}

impl HealthBar {
    pub fn new(width: f32) -> Self {
        Self { width, filled: width }
    }

    /// Negative fractions draw as empty
    pub fn update(&mut self, fraction: f32) {
        self.filled = self.width * fraction.clamp(0.0, 1.0);
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn filled(&self) -> f32 {
        self.filled
    }

    pub fn is_full(&self) -> bool {
        self.filled >= self.width
    }
}
