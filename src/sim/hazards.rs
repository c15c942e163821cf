//! Enemy hazards: falling stars, homing shooting stars, shocker breakers, star bombs
//!
//! Spawn-time parameters come from the injected RNG so runs are reproducible.

use glam::Vec2;
use rand::Rng;

use super::entity::{Affinity, Entity, FrameContext, Target};
use super::events::{GameEvent, SoundCue};
use super::geom::{Hitbox, Rect};
use crate::line_through;

pub const FALLING_STAR_HP: i32 = 6;
pub const FALLING_STAR_DAMAGE: i32 = 5;
pub const FALLING_STAR_SPEED: f32 = 4.0;
const FALLING_STAR_SPIN: f32 = 12.0;

pub const SHOOTING_STAR_DAMAGE: i32 = 10;
pub const SHOOTING_STAR_STEP: f32 = 6.0;
const SHOOTING_STAR_SPIN: f32 = 19.0;
/// Spawn band width beyond the screen edge
const SHOOTING_STAR_MARGIN: i32 = 30;

pub const BREAKER_DAMAGE: i32 = 35;
/// Strike window ends at `fps * BREAKER_LIFETIME`
pub const BREAKER_LIFETIME: f32 = 1.12;

pub const BOMB_DAMAGE: i32 = 75;
/// Detonation at `fps * BOMB_FUSE`
pub const BOMB_FUSE: f32 = 4.0;
/// Blast window ends at `fps * BOMB_BLAST_END`
pub const BOMB_BLAST_END: f32 = 4.25;

/// A star falling straight down; destructible
#[derive(Debug, Clone)]
pub struct FallingStar {
    pub id: u32,
    /// Sprite centre
    pos: Vec2,
    size: Vec2,
    hitbox: Rect,
    hp: i32,
    hit: bool,
    hurt: bool,
    hurt_cooldown: u32,
    angle: f32,
    active: bool,
}

impl FallingStar {
    pub fn spawn<R: Rng + ?Sized>(id: u32, ctx: &FrameContext, rng: &mut R) -> Self {
        let size = Vec2::new((ctx.width() / 22.0).floor(), (ctx.height() / 12.0).floor());
        // Rolled as the sprite's top-left corner
        let x = rng.random_range(0..(ctx.width() as i32).max(1)) as f32;
        let y = rng.random_range((-size.y as i32 - 10)..(-size.y as i32)) as f32;
        Self::at(id, Vec2::new(x, y) + size / 2.0, ctx)
    }

    /// A star centred on `pos`
    pub fn at(id: u32, pos: Vec2, ctx: &FrameContext) -> Self {
        let size = Vec2::new((ctx.width() / 22.0).floor(), (ctx.height() / 12.0).floor());
        let side = size.x - (size.x / 3.5).floor();
        Self {
            id,
            pos,
            size,
            hitbox: Rect::from_center(pos, Vec2::splat(side)),
            hp: FALLING_STAR_HP,
            hit: false,
            hurt: false,
            hurt_cooldown: ctx.fps / 12,
            angle: 0.0,
            active: true,
        }
    }

    pub fn sprite_rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    pub fn health(&self) -> i32 {
        self.hp
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub fn is_hurt(&self) -> bool {
        self.hurt
    }

    /// Sprite rotation in degrees
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl Entity for FallingStar {
    fn affinity(&self) -> Affinity {
        Affinity::Evil
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn hitbox(&self) -> Hitbox<'_> {
        Hitbox::Single(self.hitbox)
    }

    fn logic(&mut self, ctx: &FrameContext, _events: &mut Vec<GameEvent>) {
        if self.sprite_rect().top() > ctx.height() || self.hp <= 0 {
            self.active = false;
        }
        if self.hurt {
            if self.hurt_cooldown > 0 {
                self.hurt_cooldown -= 1;
            } else {
                self.hurt = false;
                self.hurt_cooldown = ctx.fps / 12;
            }
        }
        if self.angle >= 360.0 {
            self.angle = 0.0;
        }
    }

    fn advance(&mut self, ctx: &FrameContext) {
        if ctx.timer % 3 == 0 {
            self.angle += FALLING_STAR_SPIN;
        }
        self.pos.y += FALLING_STAR_SPEED;
        self.hitbox.set_center(self.pos);
    }

    fn collide(&mut self, other: &mut dyn Target, _ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        if !self.hit && other.hitbox().overlaps(&self.hitbox) {
            other.take_damage(FALLING_STAR_DAMAGE);
            self.hit = true;
            other.trigger_hurt(events);
        }
    }
}

impl Target for FallingStar {
    fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }

    fn trigger_hurt(&mut self, events: &mut Vec<GameEvent>) {
        self.hurt = true;
        events.push(SoundCue::StarDing.into());
    }
}

/// An indestructible star flying along the line towards where the player was
#[derive(Debug, Clone)]
pub struct ShootingStar {
    pub id: u32,
    /// Sprite top-left corner
    pos: Vec2,
    size: Vec2,
    hitbox: Rect,
    intercept: f32,
    slope: f32,
    step: f32,
    hit: bool,
    angle: f32,
    active: bool,
}

impl ShootingStar {
    pub fn spawn<R: Rng + ?Sized>(id: u32, ctx: &FrameContext, rng: &mut R) -> Self {
        let size = Vec2::new((ctx.width() / 21.0).floor(), (ctx.height() / 11.0).floor());
        let w = size.x as i32;
        let x = if rng.random_bool(0.5) {
            rng.random_range((-w - SHOOTING_STAR_MARGIN)..-w)
        } else {
            let right = ctx.width() as i32 + w;
            rng.random_range(right..right + SHOOTING_STAR_MARGIN)
        };
        let x = x as f32;
        let y = rng.random_range(0..((ctx.height() / 2.0) as i32).max(1)) as f32;
        Self::toward(id, Vec2::new(x, y), ctx.player_anchor, ctx)
    }

    /// A star with its top-left corner at `origin`, aimed at `aim`
    pub fn toward(id: u32, origin: Vec2, aim: Vec2, ctx: &FrameContext) -> Self {
        let size = Vec2::new((ctx.width() / 21.0).floor(), (ctx.height() / 11.0).floor());
        let side = size.x - (size.x / 3.5).floor();
        let (intercept, slope) = line_through(aim, origin).unwrap_or((origin.y, 0.0));
        let step = if origin.x + size.x / 2.0 < aim.x {
            SHOOTING_STAR_STEP
        } else {
            -SHOOTING_STAR_STEP
        };
        let sprite = Rect::new(origin.x, origin.y, size.x, size.y);
        Self {
            id,
            pos: origin,
            size,
            hitbox: Rect::from_center(sprite.center(), Vec2::splat(side)),
            intercept,
            slope,
            step,
            hit: false,
            angle: 0.0,
            active: true,
        }
    }

    pub fn sprite_rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Horizontal travel per frame (sign = direction)
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Point on the flight line at `x`
    pub fn line_at(&self, x: f32) -> f32 {
        self.intercept + self.slope * x
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    fn has_left_playfield(&self, ctx: &FrameContext) -> bool {
        let margin = SHOOTING_STAR_MARGIN as f32;
        if self.step > 0.0 {
            self.pos.x > ctx.width() + self.size.x + margin
        } else {
            self.pos.x < -2.0 * self.size.x - margin
        }
    }
}

impl Entity for ShootingStar {
    fn affinity(&self) -> Affinity {
        Affinity::Evil
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn hitbox(&self) -> Hitbox<'_> {
        Hitbox::Single(self.hitbox)
    }

    fn logic(&mut self, ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        if self.pos.y > ctx.height() || self.has_left_playfield(ctx) {
            self.active = false;
        }
        if self.angle >= 360.0 {
            self.angle = 0.0;
        }
        if ctx.timer % (ctx.fps / 3).max(1) == 0 {
            events.push(SoundCue::StarTwinkle.into());
        }
    }

    fn advance(&mut self, ctx: &FrameContext) {
        if ctx.timer % 4 == 0 {
            self.angle += SHOOTING_STAR_SPIN;
        }
        self.pos.x += self.step;
        self.pos.y = self.line_at(self.pos.x);
        self.hitbox.set_center(self.sprite_rect().center());
    }

    fn collide(&mut self, other: &mut dyn Target, _ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        if !self.hit && other.hitbox().overlaps(&self.hitbox) {
            other.take_damage(SHOOTING_STAR_DAMAGE);
            self.hit = true;
            other.trigger_hurt(events);
        }
    }
}

impl Target for ShootingStar {
    fn take_damage(&mut self, _amount: i32) {}

    fn trigger_hurt(&mut self, events: &mut Vec<GameEvent>) {
        events.push(SoundCue::StarSqueak.into());
    }
}

/// Enemy projectiles that live in the collision grid
#[derive(Debug, Clone)]
pub enum Star {
    Falling(FallingStar),
    Shooting(ShootingStar),
}

impl Star {
    pub fn id(&self) -> u32 {
        match self {
            Star::Falling(s) => s.id,
            Star::Shooting(s) => s.id,
        }
    }

    pub fn sprite_rect(&self) -> Rect {
        match self {
            Star::Falling(s) => s.sprite_rect(),
            Star::Shooting(s) => s.sprite_rect(),
        }
    }
}

impl Entity for Star {
    fn affinity(&self) -> Affinity {
        Affinity::Evil
    }

    fn is_active(&self) -> bool {
        match self {
            Star::Falling(s) => s.is_active(),
            Star::Shooting(s) => s.is_active(),
        }
    }

    fn hitbox(&self) -> Hitbox<'_> {
        match self {
            Star::Falling(s) => s.hitbox(),
            Star::Shooting(s) => s.hitbox(),
        }
    }

    fn center(&self) -> Vec2 {
        self.sprite_rect().center()
    }

    fn logic(&mut self, ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        match self {
            Star::Falling(s) => s.logic(ctx, events),
            Star::Shooting(s) => s.logic(ctx, events),
        }
    }

    fn advance(&mut self, ctx: &FrameContext) {
        match self {
            Star::Falling(s) => s.advance(ctx),
            Star::Shooting(s) => s.advance(ctx),
        }
    }

    fn collide(&mut self, other: &mut dyn Target, ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        match self {
            Star::Falling(s) => s.collide(other, ctx, events),
            Star::Shooting(s) => s.collide(other, ctx, events),
        }
    }
}

impl Target for Star {
    fn take_damage(&mut self, amount: i32) {
        match self {
            Star::Falling(s) => s.take_damage(amount),
            Star::Shooting(s) => s.take_damage(amount),
        }
    }

    fn trigger_hurt(&mut self, events: &mut Vec<GameEvent>) {
        match self {
            Star::Falling(s) => s.trigger_hurt(events),
            Star::Shooting(s) => s.trigger_hurt(events),
        }
    }
}

/// A columnar strike: telegraphed for one second, then briefly lethal
#[derive(Debug, Clone)]
pub struct ShockerBreaker {
    pub id: u32,
    column: Rect,
    hitbox: Rect,
    timer: u32,
    hit: bool,
    strike_played: bool,
    active: bool,
}

impl ShockerBreaker {
    pub fn spawn<R: Rng + ?Sized>(id: u32, ctx: &FrameContext, rng: &mut R) -> Self {
        let w = (ctx.width() / 15.0).floor();
        let x = rng.random_range(0..((ctx.width() - w) as i32).max(1)) as f32;
        Self::at(id, x, ctx)
    }

    /// A breaker whose column starts at `x`
    pub fn at(id: u32, x: f32, ctx: &FrameContext) -> Self {
        let w = (ctx.width() / 15.0).floor();
        let h = ctx.height();
        Self {
            id,
            column: Rect::new(x, 0.0, w, h),
            hitbox: Rect::new(x + (w / 11.0).floor(), h * 0.9, w - (w / 9.0).floor(), h * 0.05),
            timer: 0,
            hit: false,
            strike_played: false,
            active: true,
        }
    }

    /// Full column bounds
    pub fn column(&self) -> Rect {
        self.column
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Warning phase: visible, harmless
    pub fn is_telegraphing(&self, ctx: &FrameContext) -> bool {
        self.timer <= ctx.fps
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }
}

impl Entity for ShockerBreaker {
    fn affinity(&self) -> Affinity {
        Affinity::Evil
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn hitbox(&self) -> Hitbox<'_> {
        Hitbox::Single(self.hitbox)
    }

    fn logic(&mut self, ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        self.timer += 1;
        if self.timer > ctx.fps {
            if self.timer as f32 >= BREAKER_LIFETIME * ctx.fps as f32 {
                self.active = false;
            }
            if !self.strike_played && self.timer == ctx.fps + 1 {
                events.push(SoundCue::BreakerStrike.into());
                self.strike_played = true;
            }
        }
    }

    fn advance(&mut self, _ctx: &FrameContext) {}

    fn collide(&mut self, other: &mut dyn Target, ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        if self.timer > ctx.fps && !self.hit && other.hitbox().overlaps(&self.hitbox) {
            other.take_damage(BREAKER_DAMAGE);
            self.hit = true;
            other.trigger_hurt(events);
        }
    }
}

/// A bomb that glides onto the playfield, then detonates in a radial blast
#[derive(Debug, Clone)]
pub struct StarBomb {
    pub id: u32,
    /// Sprite top-left corner
    pos: Vec2,
    size: f32,
    intercept: f32,
    slope: f32,
    speed: f32,
    timer: u32,
    blast_center: Vec2,
    blast_radius: f32,
    /// Drawn blast radius, grows over the blast window
    blast_drawn: f32,
    hit: bool,
    active: bool,
}

impl StarBomb {
    pub fn spawn<R: Rng + ?Sized>(id: u32, ctx: &FrameContext, rng: &mut R) -> Self {
        let size = (ctx.width() / 5.0).floor();
        let x = if rng.random_bool(0.5) { -size } else { ctx.width() + size };
        let y = rng.random_range(0..((ctx.height() / 2.0) as i32).max(1)) as f32;
        let (left, top) = ((ctx.width() / 4.0) as i32, (ctx.height() * 0.75) as i32);
        let dest = Vec2::new(
            rng.random_range(left..((ctx.width() * 0.75) as i32).max(left + 1)) as f32,
            rng.random_range(top..(ctx.height() as i32).max(top + 1)) as f32,
        );
        let speed = rng.random_range(3..=5) as f32;
        Self::toward(id, Vec2::new(x, y), dest, speed, ctx)
    }

    /// A bomb starting at `origin` gliding at `speed` towards `dest`
    pub fn toward(id: u32, origin: Vec2, dest: Vec2, speed: f32, ctx: &FrameContext) -> Self {
        let size = (ctx.width() / 5.0).floor();
        let (intercept, slope) = line_through(dest, origin).unwrap_or((origin.y, 0.0));
        let speed = if origin.x < dest.x { speed.abs() } else { -speed.abs() };
        Self {
            id,
            pos: origin,
            size,
            intercept,
            slope,
            speed,
            timer: 0,
            blast_center: origin + Vec2::splat(size / 2.0),
            blast_radius: size * 1.5,
            blast_drawn: 0.0,
            hit: false,
            active: true,
        }
    }

    pub fn sprite_rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn blast_center(&self) -> Vec2 {
        self.blast_center
    }

    pub fn blast_radius(&self) -> f32 {
        self.blast_radius
    }

    pub fn blast_drawn(&self) -> f32 {
        self.blast_drawn
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Still gliding in
    pub fn is_approaching(&self, ctx: &FrameContext) -> bool {
        (self.timer as f32) < BOMB_FUSE * ctx.fps as f32
    }

    /// Inside the damaging blast window
    pub fn is_detonating(&self, ctx: &FrameContext) -> bool {
        let t = self.timer as f32;
        let fps = ctx.fps as f32;
        BOMB_FUSE * fps <= t && t <= BOMB_BLAST_END * fps
    }
}

impl Entity for StarBomb {
    fn affinity(&self) -> Affinity {
        Affinity::Evil
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn hitbox(&self) -> Hitbox<'_> {
        Hitbox::Single(self.sprite_rect())
    }

    fn center(&self) -> Vec2 {
        self.blast_center
    }

    fn logic(&mut self, ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        if self.timer as f32 > BOMB_BLAST_END * ctx.fps as f32 {
            self.active = false;
        }
        let summon_every = ctx.frames(0.75).max(1);
        if self.timer % summon_every == 0 && self.is_approaching(ctx) {
            events.push(SoundCue::BombSummon.into());
        }
        if self.is_detonating(ctx) {
            self.blast_drawn += self.blast_radius / (ctx.fps as f32 * (BOMB_BLAST_END - BOMB_FUSE));
        }
        if self.timer as f32 == BOMB_FUSE * ctx.fps as f32 {
            events.push(SoundCue::BombExplosion.into());
        }
        self.timer += 1;
    }

    fn advance(&mut self, ctx: &FrameContext) {
        if self.is_approaching(ctx) {
            self.pos.x += self.speed;
            self.pos.y = self.intercept + self.slope * self.pos.x;
            self.blast_center = self.sprite_rect().center();
        }
    }

    fn collide(&mut self, other: &mut dyn Target, ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        if self.is_detonating(ctx) && !self.hit {
            let d = other.center() - self.blast_center;
            if d.length_squared() <= self.blast_radius * self.blast_radius {
                other.take_damage(BOMB_DAMAGE);
                self.hit = true;
                other.trigger_hurt(events);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::boss::{BOSS_MAX_HP, Boss};
    use crate::sim::collision::HitPolicy;
    use crate::sim::player::{PLAYER_MAX_HP, Player, Shot};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx() -> FrameContext {
        let mut ctx = FrameContext::new(DEFAULT_FPS, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        ctx.player_anchor = Vec2::new(960.0, 926.0);
        ctx
    }

    fn player() -> Player {
        Player::new(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT), DEFAULT_FPS)
    }

    #[test]
    fn test_falling_star_spawns_above_screen() {
        let mut rng = Pcg32::seed_from_u64(7);
        let c = ctx();
        for id in 0..50 {
            let star = FallingStar::spawn(id, &c, &mut rng);
            assert!(star.sprite_rect().bottom() <= 0.0);
            assert!((0.0..SCREEN_WIDTH).contains(&star.sprite_rect().left()));
            assert_eq!(star.health(), FALLING_STAR_HP);
        }
    }

    #[test]
    fn test_falling_star_leaves_screen() {
        let c = ctx();
        let mut star = FallingStar::at(1, Vec2::new(100.0, -95.0), &c);
        let mut frames = 0;
        while star.is_active() {
            star.advance(&c);
            star.logic(&c, &mut Vec::new());
            frames += 1;
            assert!(frames < 400);
        }
        assert!(star.sprite_rect().top() > SCREEN_HEIGHT);
    }

    #[test]
    fn test_falling_star_destroyed_by_damage() {
        let c = ctx();
        let mut star = FallingStar::at(1, Vec2::new(100.0, 100.0), &c);
        star.take_damage(FALLING_STAR_HP);
        star.logic(&c, &mut Vec::new());
        assert!(!star.is_active());
    }

    #[test]
    fn test_falling_star_hits_player_once() {
        let c = ctx();
        let mut p = player();
        let mut star = FallingStar::at(1, p.hitbox().center(), &c);
        let mut events = Vec::new();
        star.collide(&mut p, &c, &mut events);
        star.collide(&mut p, &c, &mut events);
        assert_eq!(p.health(), PLAYER_MAX_HP - FALLING_STAR_DAMAGE);
        assert!(p.is_hurt());
        assert!(star.is_hit());
        assert!(star.is_active(), "a star that hit the player keeps falling");
    }

    #[test]
    fn test_shooting_star_heads_for_player() {
        let c = ctx();
        let mut star = ShootingStar::toward(1, Vec2::new(-100.0, 200.0), c.player_anchor, &c);
        assert!(star.step() > 0.0);
        let start = star.sprite_rect().top_left();
        for _ in 0..50 {
            star.advance(&c);
        }
        let now = star.sprite_rect().top_left();
        assert!(now.x > start.x);
        assert!(now.y > start.y, "line through the player slopes downward");
        assert!((star.line_at(c.player_anchor.x) - c.player_anchor.y).abs() < 1e-2);
    }

    #[test]
    fn test_shooting_star_spawn_sides() {
        let mut rng = Pcg32::seed_from_u64(99);
        let c = ctx();
        for id in 0..40 {
            let star = ShootingStar::spawn(id, &c, &mut rng);
            let r = star.sprite_rect();
            assert!(r.right() <= 0.0 || r.left() >= SCREEN_WIDTH);
            assert!(r.top() < SCREEN_HEIGHT / 2.0);
            let toward_player = if r.left() < 0.0 { star.step() > 0.0 } else { star.step() < 0.0 };
            assert!(toward_player);
        }
    }

    #[test]
    fn test_shooting_star_is_indestructible() {
        let c = ctx();
        let mut star = ShootingStar::toward(1, Vec2::new(-100.0, 200.0), c.player_anchor, &c);
        star.take_damage(1_000);
        star.logic(&c, &mut Vec::new());
        assert!(star.is_active());
    }

    #[test]
    fn test_shooting_star_expires_beyond_far_edge() {
        let c = ctx();
        // Aim almost horizontally so it leaves sideways, not through the bottom.
        let mut star = ShootingStar::toward(1, Vec2::new(-100.0, 300.0), Vec2::new(900.0, 310.0), &c);
        let mut frames = 0;
        while star.is_active() {
            star.advance(&c);
            star.logic(&c, &mut Vec::new());
            frames += 1;
            assert!(frames < 1_000);
        }
        assert!(star.sprite_rect().left() > SCREEN_WIDTH);
    }

    #[test]
    fn test_breaker_telegraph_then_strike() {
        let c = ctx();
        let mut p = player();
        let x = p.hitbox().center().x - 50.0;
        let mut breaker = ShockerBreaker::at(1, x, &c);
        let mut events = Vec::new();

        for _ in 0..c.fps {
            breaker.logic(&c, &mut events);
            breaker.collide(&mut p, &c, &mut events);
        }
        assert!(breaker.is_telegraphing(&c));
        assert_eq!(p.health(), PLAYER_MAX_HP, "harmless while telegraphing");

        breaker.logic(&c, &mut events);
        assert_eq!(events, vec![GameEvent::Sound(SoundCue::BreakerStrike)]);
        breaker.collide(&mut p, &c, &mut events);
        breaker.collide(&mut p, &c, &mut events);
        assert_eq!(p.health(), PLAYER_MAX_HP - BREAKER_DAMAGE);

        while breaker.is_active() {
            breaker.logic(&c, &mut events);
        }
        assert_eq!(breaker.timer(), 68);
        let strikes = events.iter().filter(|e| **e == GameEvent::Sound(SoundCue::BreakerStrike)).count();
        assert_eq!(strikes, 1);
    }

    #[test]
    fn test_bomb_detonates_on_player() {
        let c = ctx();
        let mut p = player();
        let mut bomb = StarBomb::toward(1, Vec2::new(-384.0, 200.0), Vec2::new(800.0, 900.0), 4.0, &c);
        let mut events = Vec::new();
        while bomb.is_approaching(&c) {
            bomb.advance(&c);
            bomb.collide(&mut p, &c, &mut events);
            bomb.logic(&c, &mut events);
        }
        assert_eq!(p.health(), PLAYER_MAX_HP, "no damage before detonation");

        // Pull the blast onto the player so the outcome does not depend on flight.
        bomb.blast_center = p.center();
        bomb.collide(&mut p, &c, &mut events);
        bomb.collide(&mut p, &c, &mut events);
        assert_eq!(p.health(), PLAYER_MAX_HP - BOMB_DAMAGE);
        assert!(events.contains(&GameEvent::Sound(SoundCue::BombSummon)));

        let mut frames = 0;
        while bomb.is_active() {
            bomb.logic(&c, &mut events);
            frames += 1;
            assert!(frames < 100);
        }
        assert!(events.contains(&GameEvent::Sound(SoundCue::BombExplosion)));
    }

    #[test]
    fn test_bomb_blast_misses_distant_player() {
        let c = ctx();
        let mut p = player();
        let mut bomb = StarBomb::toward(1, Vec2::new(-384.0, 0.0), Vec2::new(0.0, 10.0), 3.0, &c);
        bomb.timer = BOMB_FUSE as u32 * c.fps;
        bomb.blast_center = Vec2::new(-2_000.0, -2_000.0);
        bomb.collide(&mut p, &c, &mut Vec::new());
        assert_eq!(p.health(), PLAYER_MAX_HP);
        assert!(!bomb.is_hit());
    }

    /// A fresh entity of each kind, already dealt lethal damage where it can take any
    fn doomed(kind: usize, c: &FrameContext) -> Box<dyn Entity> {
        let bounds = Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        match kind {
            0 => Box::new(Shot::new(1, Vec2::new(500.0, 100.0), bounds, HitPolicy::FirstContact)),
            1 => {
                let mut star = FallingStar::at(1, Vec2::new(300.0, 300.0), c);
                star.take_damage(FALLING_STAR_HP);
                Box::new(star)
            }
            2 => Box::new(ShootingStar::toward(1, Vec2::new(-100.0, 300.0), Vec2::new(900.0, 310.0), c)),
            3 => Box::new(ShockerBreaker::at(1, 400.0, c)),
            4 => Box::new(StarBomb::toward(1, Vec2::new(-384.0, 200.0), Vec2::new(800.0, 900.0), 4.0, c)),
            5 => {
                let mut p = player();
                p.take_damage(PLAYER_MAX_HP);
                Box::new(p)
            }
            _ => {
                let mut boss = Boss::new(bounds);
                boss.take_damage(BOSS_MAX_HP);
                Box::new(boss)
            }
        }
    }

    proptest! {
        #[test]
        fn prop_deactivation_is_permanent(kind in 0usize..7, start in 0u32..TIMER_WRAP, extra in 1u32..400) {
            let mut c = ctx();
            c.timer = start;
            let mut entity = doomed(kind, &c);
            let mut target = player();
            let mut events = Vec::new();

            let mut frames = 0;
            while entity.is_active() {
                entity.advance(&c);
                entity.logic(&c, &mut events);
                c.timer = (c.timer + 1) % TIMER_WRAP;
                frames += 1;
                prop_assert!(frames < 2_000);
            }
            for _ in 0..extra {
                entity.collide(&mut target, &c, &mut events);
                entity.advance(&c);
                entity.logic(&c, &mut events);
                c.timer = (c.timer + 1) % TIMER_WRAP;
                prop_assert!(!entity.is_active());
            }
        }
    }
}
