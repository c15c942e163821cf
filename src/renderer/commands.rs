//! Draw command types

use glam::Vec2;

use crate::cutscene::CutsceneKind;
use crate::sim::boss::BossPhase;
use crate::sim::geom::Rect;

/// Sprite selection; a backend maps these to textures
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sprite {
    /// Two-frame idle/firing animation
    Player { frame: u8, firing: bool, hurt: bool },
    /// `impact` counts up once the shot has hit something
    Shot { impact: Option<u32> },
    FallingStar { hurt: bool },
    ShootingStar,
    Breaker { striking: bool },
    Bomb,
    Boss { phase: BossPhase, hurt: bool, winking: bool },
    HeartIcon,
    BossIcon,
}

/// One drawing operation in screen space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear([f32; 4]),
    /// Tiled scrolling background (drawn at `offset` and `offset - height`)
    Background { offset: f32, height: f32 },
    Sprite { sprite: Sprite, rect: Rect, angle: f32 },
    /// Rectangle outline
    Outline { rect: Rect, color: [f32; 4] },
    /// Filled circle
    Circle { center: Vec2, radius: f32, color: [f32; 4] },
    HealthBar {
        icon: Sprite,
        origin: Vec2,
        width: f32,
        height: f32,
        filled: f32,
    },
    Button { rect: Rect, label: &'static str, hovered: bool },
    Slider { rect: Rect, handle_x: f32 },
    CutsceneStep { kind: CutsceneKind, step: usize, timer: u32 },
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const CUTSCENE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const BREAKER_WARNING: [f32; 4] = [0.9, 0.85, 0.3, 0.6];
    pub const BLAST: [f32; 4] = [1.0, 0.4, 0.2, 0.8];
    pub const HEALTH_FULL: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
    pub const HEALTH_EMPTY: [f32; 4] = [0.25, 0.0, 0.0, 1.0];
}
