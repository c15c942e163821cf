//! Starfall - a single-screen boss-rush shoot-em-up
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, boss phases, stage director)
//! - `renderer`: Draw-command surface the simulation renders into
//! - `controller`: Menu / cutscene / game engines and the mode dispatcher
//! - `platform`: Input sources and frame pacing
//! - `audio`: Fire-and-forget sound cue playback

pub mod audio;
pub mod controller;
pub mod cutscene;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use controller::{Controller, Mode};
pub use settings::{HitPolicy, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame rate (all cadences are derived from the configured fps)
    pub const DEFAULT_FPS: u32 = 60;
    /// Lowest supported frame rate (fps/15 must stay >= 1)
    pub const MIN_FPS: u32 = 15;

    /// Reference playfield dimensions
    pub const SCREEN_WIDTH: f32 = 1920.0;
    pub const SCREEN_HEIGHT: f32 = 1080.0;
    /// Smallest playfield that keeps every derived sprite and widget non-empty
    pub const MIN_SCREEN_WIDTH: f32 = 320.0;
    pub const MIN_SCREEN_HEIGHT: f32 = 240.0;

    /// Broad-phase grid cell edge length
    pub const CELL_SIZE: f32 = 100.0;

    /// The stage frame counter wraps back to zero here
    pub const TIMER_WRAP: u32 = 10_000;

    /// Collision checks run every `fps / COLLISION_DIVISOR` frames
    pub const COLLISION_DIVISOR: u32 = 10;
    /// Spawn scheduler cadence is `fps / SPAWN_DIVISOR` frames
    pub const SPAWN_DIVISOR: u32 = 15;

    /// Background scroll speed (units per simulated frame)
    pub const BACKGROUND_SPEED: f32 = 2.0;
}

/// Intercept and slope of the line through `a` and `b`, i.e. `y = c + m * x`.
///
/// Returns `None` for a vertical line (equal x coordinates).
#[inline]
pub fn line_through(a: Vec2, b: Vec2) -> Option<(f32, f32)> {
    let dx = b.x - a.x;
    if dx.abs() < f32::EPSILON {
        return None;
    }
    let slope = (b.y - a.y) / dx;
    Some((a.y - slope * a.x, slope))
}

/// Integer frame count for a fraction of the frame rate (`fps * factor`, floored)
#[inline]
pub fn frames(fps: u32, factor: f32) -> u32 {
    (fps as f32 * factor).floor() as u32
}
