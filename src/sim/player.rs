//! The player ship and its shots

use glam::Vec2;

use super::collision::HitPolicy;
use super::entity::{Affinity, Entity, FrameContext, Target};
use super::events::{GameEvent, SoundCue};
use super::geom::{Hitbox, Rect};

/// Player starting (and maximum) health
pub const PLAYER_MAX_HP: i32 = 250;
/// Horizontal speed (units per frame)
pub const PLAYER_SPEED: f32 = 10.0;

/// Shot vertical speed (units per frame, upward)
pub const SHOT_SPEED: f32 = 10.0;
/// Damage dealt by one shot
pub const SHOT_DAMAGE: i32 = 2;
/// Logic ticks a shot lingers after impact
pub const SHOT_IMPACT_TICKS: u32 = 9;

/// A player projectile
#[derive(Debug, Clone)]
pub struct Shot {
    pub id: u32,
    /// Sprite mid-bottom point
    pos: Vec2,
    size: Vec2,
    hitbox: Rect,
    hit: bool,
    /// Hit recorded during the current pass (`HitPolicy::PassWide` only)
    pending_hit: bool,
    hit_timer: u32,
    active: bool,
    policy: HitPolicy,
}

impl Shot {
    /// Spawn a shot whose sprite sits on top of `muzzle`
    pub fn new(id: u32, muzzle: Vec2, bounds: Vec2, policy: HitPolicy) -> Self {
        let size = Vec2::new((bounds.x / 30.0).floor(), (bounds.y / 20.0).floor());
        let hit_size = Vec2::new(size.x - (size.x / 1.5).floor(), size.y - (size.y / 8.0).floor());
        let mut hitbox = Rect::new(0.0, 0.0, hit_size.x, hit_size.y);
        hitbox.set_mid_bottom(muzzle - Vec2::new(2.0, 0.0));
        Self {
            id,
            pos: muzzle,
            size,
            hitbox,
            hit: false,
            pending_hit: false,
            hit_timer: 0,
            active: true,
            policy,
        }
    }

    /// Sprite bounds
    pub fn sprite_rect(&self) -> Rect {
        let mut rect = Rect::new(0.0, 0.0, self.size.x, self.size.y);
        rect.set_mid_bottom(self.pos);
        rect
    }

    /// The one-shot damage guard has been consumed
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Impact animation progress (0 until hit)
    pub fn hit_timer(&self) -> u32 {
        self.hit_timer
    }

    pub fn damage(&self) -> i32 {
        SHOT_DAMAGE
    }

    /// Close a resolution pass: hits recorded under `PassWide` consume the guard now
    pub fn commit_pass(&mut self) {
        if self.pending_hit {
            self.hit = true;
            self.pending_hit = false;
        }
    }
}

impl Entity for Shot {
    fn affinity(&self) -> Affinity {
        Affinity::Good
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn hitbox(&self) -> Hitbox<'_> {
        Hitbox::Single(self.hitbox)
    }

    fn center(&self) -> Vec2 {
        self.sprite_rect().center()
    }

    fn logic(&mut self, _ctx: &FrameContext, _events: &mut Vec<GameEvent>) {
        if self.hit {
            self.hit_timer += 1;
            if self.hit_timer > SHOT_IMPACT_TICKS {
                self.active = false;
            }
        }
        if self.pos.y < -self.size.y - 5.0 {
            self.active = false;
        }
    }

    fn advance(&mut self, _ctx: &FrameContext) {
        if !self.hit {
            self.pos.y -= SHOT_SPEED;
            self.hitbox.set_mid_bottom(self.pos - Vec2::new(2.0, 0.0));
        }
    }

    fn collide(&mut self, other: &mut dyn Target, _ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        if self.hit {
            return;
        }
        if other.hitbox().overlaps(&self.hitbox) {
            other.take_damage(SHOT_DAMAGE);
            other.trigger_hurt(events);
            match self.policy {
                HitPolicy::FirstContact => self.hit = true,
                HitPolicy::PassWide => self.pending_hit = true,
            }
        }
    }
}

/// The player ship
#[derive(Debug, Clone)]
pub struct Player {
    hp: i32,
    max_hp: i32,
    /// Sprite top-left corner
    pos: Vec2,
    size: Vec2,
    bounds: Vec2,
    hitbox: Rect,
    direction: i32,
    fps: u32,
    shot_cooldown: u32,
    animation_cooldown: u32,
    hurt_cooldown: u32,
    hurt: bool,
    /// Firing pose is showing
    firing: bool,
    has_fired: bool,
    alive: bool,
}

impl Player {
    pub fn new(bounds: Vec2, fps: u32) -> Self {
        let size = Vec2::new((bounds.x / 13.0).floor(), (bounds.y / 7.0).floor());
        let pos = Vec2::new((bounds.x / 2.0).floor(), bounds.y - size.y);
        let hit_size = Vec2::new(size.x - (size.x / 1.65).floor(), size.y - (size.y / 4.0).floor());
        let mut player = Self {
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            pos,
            size,
            bounds,
            hitbox: Rect::new(0.0, 0.0, hit_size.x, hit_size.y),
            direction: 0,
            fps,
            shot_cooldown: fps / 3,
            animation_cooldown: fps / 6,
            hurt_cooldown: fps / 12,
            hurt: false,
            firing: false,
            has_fired: false,
            alive: true,
        };
        player.sync_hitbox();
        player
    }

    fn sync_hitbox(&mut self) {
        let center = self.pos + self.size / 2.0 - Vec2::new(3.0, 0.0);
        self.hitbox.set_center(center);
    }

    /// Sprite bounds
    pub fn sprite_rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Sprite top-left corner
    pub fn anchor(&self) -> Vec2 {
        self.pos
    }

    /// Where new shots appear
    pub fn muzzle(&self) -> Vec2 {
        self.sprite_rect().mid_top()
    }

    /// Set the held movement direction (clamped to -1..=1)
    pub fn set_direction(&mut self, direction: i32) {
        self.direction = direction.clamp(-1, 1);
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    /// Move `direction` steps horizontally, staying inside the playfield
    pub fn move_by(&mut self, direction: i32) {
        let max_x = (self.bounds.x - self.size.x).max(0.0);
        self.pos.x = (self.pos.x + direction as f32 * PLAYER_SPEED).clamp(0.0, max_x);
        self.sync_hitbox();
    }

    /// Try to fire. Returns true if a shot should be spawned at `muzzle()`.
    ///
    /// The very first shot ignores the cooldown.
    pub fn shoot(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if self.has_fired && self.shot_cooldown != 0 {
            return false;
        }
        self.has_fired = true;
        self.firing = true;
        self.shot_cooldown = self.fps / 3;
        self.animation_cooldown = self.fps / 6;
        events.push(SoundCue::PlayerShoot.into());
        true
    }

    pub fn health(&self) -> i32 {
        self.hp
    }

    pub fn max_health(&self) -> i32 {
        self.max_hp
    }

    /// Health bar fill, clamped to [0, 1]
    pub fn health_fraction(&self) -> f32 {
        (self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    pub fn has_full_health(&self) -> bool {
        self.hp == self.max_hp
    }

    pub fn is_hurt(&self) -> bool {
        self.hurt
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    pub fn shot_cooldown(&self) -> u32 {
        self.shot_cooldown
    }
}

impl Entity for Player {
    fn affinity(&self) -> Affinity {
        Affinity::Good
    }

    fn is_active(&self) -> bool {
        self.alive
    }

    fn hitbox(&self) -> Hitbox<'_> {
        Hitbox::Single(self.hitbox)
    }

    fn center(&self) -> Vec2 {
        self.sprite_rect().center()
    }

    fn logic(&mut self, _ctx: &FrameContext, _events: &mut Vec<GameEvent>) {
        if self.hurt {
            if self.hurt_cooldown > 0 {
                self.hurt_cooldown -= 1;
            } else {
                self.hurt = false;
                self.hurt_cooldown = self.fps / 12;
            }
        }
        self.animation_cooldown = self.animation_cooldown.saturating_sub(1);
        self.shot_cooldown = self.shot_cooldown.saturating_sub(1);
        if self.has_fired && self.animation_cooldown == 0 {
            self.firing = false;
        }
        if self.hp <= 0 {
            self.alive = false;
        }
    }

    fn advance(&mut self, _ctx: &FrameContext) {
        self.move_by(self.direction);
    }
}

impl Target for Player {
    fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }

    fn trigger_hurt(&mut self, events: &mut Vec<GameEvent>) {
        self.hurt = true;
        events.push(SoundCue::PlayerHurt.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn bounds() -> Vec2 {
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    fn ctx() -> FrameContext {
        FrameContext::new(DEFAULT_FPS, bounds())
    }

    #[test]
    fn test_player_spawn_layout() {
        let p = Player::new(bounds(), DEFAULT_FPS);
        assert_eq!(p.sprite_rect(), Rect::new(960.0, 926.0, 147.0, 154.0));
        assert_eq!(p.health(), PLAYER_MAX_HP);
        assert!(p.has_full_health());
        assert!(p.is_active());
    }

    #[test]
    fn test_move_left_at_edge_is_clamped() {
        let mut p = Player::new(bounds(), DEFAULT_FPS);
        while p.anchor().x > 0.0 {
            p.move_by(-1);
        }
        assert_eq!(p.anchor().x, 0.0);
        p.move_by(-1);
        assert_eq!(p.anchor().x, 0.0);
    }

    #[test]
    fn test_shoot_cooldown() {
        let mut p = Player::new(bounds(), DEFAULT_FPS);
        let mut events = Vec::new();
        assert!(p.shoot(&mut events), "first shot ignores cooldown");
        assert!(!p.shoot(&mut events));
        for _ in 0..DEFAULT_FPS / 3 {
            p.logic(&ctx(), &mut events);
        }
        assert!(p.shoot(&mut events));
        let shots = events.iter().filter(|e| **e == GameEvent::Sound(SoundCue::PlayerShoot)).count();
        assert_eq!(shots, 2);
    }

    #[test]
    fn test_zero_health_deactivates_on_logic() {
        let mut p = Player::new(bounds(), DEFAULT_FPS);
        p.take_damage(PLAYER_MAX_HP);
        assert_eq!(p.health(), 0);
        p.logic(&ctx(), &mut Vec::new());
        assert!(!p.is_active());
        assert_eq!(p.health_fraction(), 0.0);
        p.take_damage(10);
        p.logic(&ctx(), &mut Vec::new());
        assert!(!p.is_active());
        assert_eq!(p.health_fraction(), 0.0);
    }

    #[test]
    fn test_hurt_flash_expires() {
        let mut p = Player::new(bounds(), DEFAULT_FPS);
        let mut events = Vec::new();
        p.trigger_hurt(&mut events);
        assert!(p.is_hurt());
        assert_eq!(events, vec![GameEvent::Sound(SoundCue::PlayerHurt)]);
        for _ in 0..=DEFAULT_FPS / 12 {
            p.logic(&ctx(), &mut events);
        }
        assert!(!p.is_hurt());
    }

    #[test]
    fn test_shot_flies_up_and_expires() {
        let mut shot = Shot::new(1, Vec2::new(500.0, 100.0), bounds(), HitPolicy::FirstContact);
        let c = ctx();
        let mut events = Vec::new();
        let mut frames = 0;
        while shot.is_active() {
            shot.advance(&c);
            shot.logic(&c, &mut events);
            frames += 1;
            assert!(frames < 100);
        }
        assert!(shot.sprite_rect().bottom() < 0.0);
    }

    #[test]
    fn test_hit_shot_lingers_then_expires() {
        let mut shot = Shot::new(1, Vec2::new(500.0, 500.0), bounds(), HitPolicy::FirstContact);
        let mut player = Player::new(bounds(), DEFAULT_FPS);
        // Place the player's hitbox over the shot.
        let target_x = shot.hitbox.center().x;
        while player.hitbox.center().x > target_x + PLAYER_SPEED {
            player.move_by(-1);
        }
        player.pos.y = 450.0;
        player.sync_hitbox();
        let c = ctx();
        let mut events = Vec::new();
        shot.collide(&mut player, &c, &mut events);
        assert!(shot.is_hit());
        let y = shot.sprite_rect().y;
        for _ in 0..SHOT_IMPACT_TICKS {
            shot.advance(&c);
            shot.logic(&c, &mut events);
            assert!(shot.is_active());
        }
        assert_eq!(shot.sprite_rect().y, y, "a spent shot stops moving");
        shot.logic(&c, &mut events);
        assert!(!shot.is_active());
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_playfield(steps in proptest::collection::vec(-50i32..50, 1..200)) {
            let mut p = Player::new(bounds(), DEFAULT_FPS);
            let max_x = SCREEN_WIDTH - p.sprite_rect().w;
            for dir in steps {
                p.move_by(dir);
                prop_assert!(p.anchor().x >= 0.0);
                prop_assert!(p.anchor().x <= max_x);
            }
        }
    }
}
