//! Common capability contract for simulated actors

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::geom::Hitbox;

/// Which side an entity fights for; decides which collision pairs are tested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Affinity {
    /// Player-aligned
    Good,
    /// Enemy-aligned
    Evil,
}

/// Read-only per-frame context handed to entity logic and motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Stage frame counter (wraps at `TIMER_WRAP`)
    pub timer: u32,
    /// Simulation frame rate
    pub fps: u32,
    /// Playfield size
    pub bounds: Vec2,
    /// Player sprite top-left corner (homing hazards aim here)
    pub player_anchor: Vec2,
    /// A star bomb was spawned this frame
    pub bomb_spawned: bool,
}

impl FrameContext {
    pub fn new(fps: u32, bounds: Vec2) -> Self {
        Self {
            timer: 0,
            fps,
            bounds,
            player_anchor: Vec2::ZERO,
            bomb_spawned: false,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.bounds.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bounds.y
    }

    /// `fps * factor` in whole frames
    #[inline]
    pub fn frames(&self, factor: f32) -> u32 {
        crate::frames(self.fps, factor)
    }
}

/// Every simulated actor
///
/// Once `is_active` returns false it must never return true again; the stage
/// director drops inactive entities at the end of the logic phase.
pub trait Entity {
    fn affinity(&self) -> Affinity;

    /// Liveness
    fn is_active(&self) -> bool;

    fn hitbox(&self) -> Hitbox<'_>;

    /// Broad-phase anchor point
    fn center(&self) -> Vec2 {
        self.hitbox().center()
    }

    /// Advance timers and decide deactivation
    fn logic(&mut self, ctx: &FrameContext, events: &mut Vec<GameEvent>);

    /// Update position
    fn advance(&mut self, ctx: &FrameContext);

    /// Test against `other` and apply one-shot damage
    fn collide(&mut self, _other: &mut dyn Target, _ctx: &FrameContext, _events: &mut Vec<GameEvent>) {}
}

/// Something that can receive damage
pub trait Target: Entity {
    fn take_damage(&mut self, amount: i32);

    /// Transient hurt flash + cue; independent of the attacker's hit guard
    fn trigger_hurt(&mut self, events: &mut Vec<GameEvent>);
}
