//! The boss and its health-driven phase machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Affinity, Entity, FrameContext, Target};
use super::events::{GameEvent, SoundCue};
use super::geom::{Hitbox, Rect};
use super::stage::{PHASE_2_STAGE, PHASE_3_STAGE, PHASE_4_STAGE, StageParams};

pub const BOSS_MAX_HP: i32 = 400;
/// Frames the hurt flash lasts
pub const BOSS_HURT_FRAMES: u32 = 10;
/// Frames the wink lasts
pub const BOSS_WINK_FRAMES: u32 = 18;

/// Vertical bobbing range of the sprite's top edge
const BOB_TOP: i32 = -80;
const BOB_BOTTOM: i32 = -40;

/// Boss phase; only ever advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BossPhase {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl BossPhase {
    pub fn number(self) -> u8 {
        self as u8
    }
}

/// A health threshold that advances the phase exactly once
struct PhaseGate {
    threshold: i32,
    phase: BossPhase,
    stage: StageParams,
    cue: SoundCue,
}

const PHASE_GATES: [PhaseGate; 3] = [
    PhaseGate {
        threshold: 300,
        phase: BossPhase::Two,
        stage: PHASE_2_STAGE,
        cue: SoundCue::BossPhaseShift,
    },
    PhaseGate {
        threshold: 200,
        phase: BossPhase::Three,
        stage: PHASE_3_STAGE,
        cue: SoundCue::BossPhaseShift,
    },
    PhaseGate {
        threshold: 100,
        phase: BossPhase::Four,
        stage: PHASE_4_STAGE,
        cue: SoundCue::BossFinalPhase,
    },
];

/// The boss
#[derive(Debug, Clone)]
pub struct Boss {
    pub(crate) hp: i32,
    max_hp: i32,
    phase: BossPhase,
    /// Gates already passed, in `PHASE_GATES` order
    latched: [bool; 3],
    /// Stage reconfigurations not yet collected by the director
    pending_stage: Vec<StageParams>,
    center_x: f32,
    /// Sprite top edge
    y: i32,
    dir: i32,
    size: Vec2,
    hitboxes: [Rect; 3],
    hurt: bool,
    hurt_timer: u32,
    wink: bool,
    wink_timer: u32,
    alive: bool,
}

impl Boss {
    pub fn new(bounds: Vec2) -> Self {
        let w = (bounds.x / 3.0).floor();
        let h = bounds.y / 1.1;
        let x = (bounds.x / 2.0).floor();
        let y = BOB_TOP as f32;

        let core = Rect::new(
            x - (w / 3.6).floor(),
            y + (h / 2.5).floor(),
            w - (w / 2.4).floor(),
            100.0,
        );
        let wings = Rect::new(
            x - (w / 2.25).floor(),
            y + (h / 3.5).floor(),
            w - (w / 11.0).floor(),
            40.0,
        );
        let tail = Rect::new(core.center().x - (w / 26.0).floor(), core.bottom(), 38.0, 190.0);

        Self {
            hp: BOSS_MAX_HP,
            max_hp: BOSS_MAX_HP,
            phase: BossPhase::One,
            latched: [false; 3],
            pending_stage: Vec::new(),
            center_x: x,
            y: BOB_TOP,
            dir: 1,
            size: Vec2::new(w, h),
            hitboxes: [core, wings, tail],
            hurt: false,
            hurt_timer: 0,
            wink: false,
            wink_timer: 0,
            alive: true,
        }
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    pub fn health(&self) -> i32 {
        self.hp
    }

    /// Health bar fill, clamped to [0, 1]
    pub fn health_fraction(&self) -> f32 {
        (self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    pub fn is_hurt(&self) -> bool {
        self.hurt
    }

    pub fn is_winking(&self) -> bool {
        self.wink
    }

    pub fn sprite_rect(&self) -> Rect {
        Rect::new(self.center_x - self.size.x / 2.0, self.y as f32, self.size.x, self.size.y)
    }

    /// Stage reconfigurations produced by phase changes since the last call, oldest first
    pub fn drain_stage_changes(&mut self) -> Vec<StageParams> {
        std::mem::take(&mut self.pending_stage)
    }

    /// Apply every phase gate the current health has crossed and not yet fired
    fn check_phase_gates(&mut self, events: &mut Vec<GameEvent>) {
        for (gate, latched) in PHASE_GATES.iter().zip(self.latched.iter_mut()) {
            if *latched || self.hp > gate.threshold {
                continue;
            }
            *latched = true;
            if gate.phase > self.phase {
                self.phase = gate.phase;
            }
            log::info!("Boss phase {} (hp {})", gate.phase.number(), self.hp);
            events.push(gate.cue.into());
            events.push(GameEvent::PhaseChanged(gate.phase));
            self.pending_stage.push(gate.stage);
        }
    }
}

impl Entity for Boss {
    fn affinity(&self) -> Affinity {
        Affinity::Evil
    }

    fn is_active(&self) -> bool {
        self.alive
    }

    fn hitbox(&self) -> Hitbox<'_> {
        Hitbox::Composite(&self.hitboxes)
    }

    fn logic(&mut self, ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        if self.y <= BOB_TOP {
            self.dir = 1;
        } else if self.y >= BOB_BOTTOM {
            self.dir = -1;
        }

        if ctx.bomb_spawned {
            events.push(SoundCue::BossRoar.into());
            self.wink = true;
        }

        if self.wink {
            self.wink_timer += 1;
        }
        if self.hurt {
            self.hurt_timer += 1;
        }
        if self.hurt_timer >= BOSS_HURT_FRAMES {
            self.hurt = false;
            self.hurt_timer = 0;
        }
        if self.wink_timer >= BOSS_WINK_FRAMES {
            self.wink = false;
            self.wink_timer = 0;
        }

        self.check_phase_gates(events);

        if self.hp <= 0 {
            self.alive = false;
        }
    }

    fn advance(&mut self, _ctx: &FrameContext) {
        self.y += self.dir;
        let delta = Vec2::new(0.0, self.dir as f32);
        for rect in &mut self.hitboxes {
            rect.translate(delta);
        }
    }
}

impl Target for Boss {
    fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }

    fn trigger_hurt(&mut self, events: &mut Vec<GameEvent>) {
        self.hurt = true;
        events.push(SoundCue::BossHurt.into());
    }
}
