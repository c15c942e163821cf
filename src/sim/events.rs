//! Side effects emitted by the simulation
//!
//! The simulation never talks to audio or UI directly. It appends events to
//! an outbox that the frontend drains once per frame.

use serde::{Deserialize, Serialize};

use super::boss::BossPhase;

/// Sound cues (fire-and-forget, no feedback into simulation state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player fired a shot
    PlayerShoot,
    /// Player took damage
    PlayerHurt,
    /// A falling star was hit by a shot
    StarDing,
    /// A shooting star was hit by a shot
    StarSqueak,
    /// Periodic shooting star twinkle
    StarTwinkle,
    /// Shocker breaker column strikes
    BreakerStrike,
    /// Star bomb summon pulse during approach
    BombSummon,
    /// Star bomb detonation
    BombExplosion,
    /// Boss was hit
    BossHurt,
    /// Boss reacts to a bomb spawn
    BossRoar,
    /// Boss enters phase 2 or 3
    BossPhaseShift,
    /// Boss enters its final phase
    BossFinalPhase,
    /// Pointer entered a menu button
    MenuHover,
    /// Menu button pressed
    MenuPress,
}

/// Simulation output for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    /// Boss crossed a health threshold
    PhaseChanged(BossPhase),
    BombSpawned,
    /// Gameplay suspended; background music should pause
    Paused,
    /// Gameplay resumed; background music should continue
    Resumed,
}

impl From<SoundCue> for GameEvent {
    fn from(cue: SoundCue) -> Self {
        GameEvent::Sound(cue)
    }
}
