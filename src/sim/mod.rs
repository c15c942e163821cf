//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (creation order, ordered grid cells)
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod entity;
pub mod events;
pub mod geom;
pub mod hazards;
pub mod player;
pub mod stage;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossPhase};
pub use collision::{CollisionGrid, HitPolicy, ProjectileRef, resolve_projectiles};
pub use entity::{Affinity, Entity, FrameContext, Target};
pub use events::{GameEvent, SoundCue};
pub use geom::{Hitbox, Rect};
pub use hazards::{FallingStar, ShockerBreaker, ShootingStar, Star, StarBomb};
pub use player::{Player, Shot};
pub use stage::{LiveCounts, StageError, StageParams};
pub use state::{GameOutcome, GameState, PauseMenu};
pub use tick::{TickInput, tick};
