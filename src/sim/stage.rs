//! Hazard spawn configuration
//!
//! The boss reconfigures the stage on every phase change through
//! `GameState::update_stage`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Spawn parameters of the stage director
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageParams {
    /// Seconds between star bombs (converted to frames only when compared)
    pub bomb_frequency: u32,
    /// Maximum concurrently active shocker breakers
    pub breaker_limit: u32,
    /// Maximum concurrently active falling + shooting stars
    pub max_stars: u32,
    /// Per-evaluation probability of a falling star
    pub falling_star_chance: f32,
    /// Per-evaluation probability of a shooting star
    pub shooting_star_chance: f32,
    /// Per-evaluation probability of a breaker batch
    pub breaker_chance: f32,
}

impl StageParams {
    pub const fn new(
        bomb_frequency: u32,
        breaker_limit: u32,
        max_stars: u32,
        falling_star_chance: f32,
        shooting_star_chance: f32,
        breaker_chance: f32,
    ) -> Self {
        Self {
            bomb_frequency,
            breaker_limit,
            max_stars,
            falling_star_chance,
            shooting_star_chance,
            breaker_chance,
        }
    }

    /// Check ranges: chances finite in [0, 1], non-zero bomb frequency
    pub fn validate(&self) -> Result<(), StageError> {
        if self.bomb_frequency == 0 {
            return Err(StageError::ZeroBombFrequency);
        }
        let chances = [
            ("falling_star_chance", self.falling_star_chance),
            ("shooting_star_chance", self.shooting_star_chance),
            ("breaker_chance", self.breaker_chance),
        ];
        for (name, value) in chances {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(StageError::ChanceOutOfRange { name, value });
            }
        }
        Ok(())
    }

    /// Bomb period in frames at `fps`
    pub fn bomb_period_frames(&self, fps: u32) -> u64 {
        self.bomb_frequency as u64 * fps as u64
    }
}

impl Default for StageParams {
    fn default() -> Self {
        OPENING_STAGE
    }
}

/// Rejected `update_stage` input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    #[error("bomb frequency must be at least one second")]
    ZeroBombFrequency,
    #[error("{name} must be within [0, 1], got {value}")]
    ChanceOutOfRange { name: &'static str, value: f32 },
}

/// Effectively never (the frame counter wraps long before)
const NO_BOMBS: u32 = 1_000_000;

/// Configuration before the first phase change
pub const OPENING_STAGE: StageParams = StageParams::new(NO_BOMBS, 3, 8, 0.04, 0.0, 0.0);
/// Boss phase 2 (hp <= 300)
pub const PHASE_2_STAGE: StageParams = StageParams::new(NO_BOMBS, 0, 10, 0.035, 0.01, 0.0);
/// Boss phase 3 (hp <= 200)
pub const PHASE_3_STAGE: StageParams = StageParams::new(NO_BOMBS, 3, 12, 0.04, 0.03, 0.006);
/// Boss phase 4 (hp <= 100)
pub const PHASE_4_STAGE: StageParams = StageParams::new(10, 6, 14, 0.045, 0.04, 0.006);

/// Per-kind live counts owned by the stage director
///
/// Incremented on spawn and decremented when the owning collection drops an
/// inactive entity; never derived from object lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveCounts {
    pub shots: u32,
    pub stars: u32,
    pub breakers: u32,
    pub bombs: u32,
}
