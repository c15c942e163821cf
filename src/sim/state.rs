//! Game state and stage director bookkeeping
//!
//! The state owns every entity collection. Only the director (this module and
//! `tick`) adds or removes entries; entities mutate each other exclusively
//! through `take_damage` and `trigger_hurt` during collision resolution.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::collision::HitPolicy;
use super::entity::{Entity, FrameContext};
use super::events::GameEvent;
use super::hazards::{FallingStar, ShockerBreaker, ShootingStar, Star, StarBomb};
use super::player::{Player, Shot};
use super::stage::{LiveCounts, OPENING_STAGE, StageError, StageParams};
use super::geom::Rect;
use crate::consts::*;
use crate::ui::Button;

/// How a game session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The player died
    Lost,
    /// The boss died; `flawless` when the player was at full health
    Won { flawless: bool },
    /// Quit from the pause menu, window close, or frame cap
    Interrupted,
}

/// QUIT / RESUME overlay shown while paused
#[derive(Debug, Clone, PartialEq)]
pub struct PauseMenu {
    pub quit: Button,
    pub resume: Button,
}

impl PauseMenu {
    pub fn new(bounds: Vec2) -> Self {
        let (w, h) = (bounds.x, bounds.y);
        let x = (w / 2.0).floor() - (w / 6.0).floor();
        let size = Vec2::new((w / 3.0).floor(), h * 0.2);
        let mut menu = Self {
            quit: Button::new(Rect::new(x, h * 0.25, size.x, size.y), "QUIT"),
            resume: Button::new(Rect::new(x, h * 0.55, size.x, size.y), "RESUME"),
        };
        menu.hide();
        menu
    }

    pub fn show(&mut self) {
        self.quit.show();
        self.resume.show();
    }

    pub fn hide(&mut self) {
        self.quit.hide();
        self.resume.hide();
    }
}

/// Complete state of one game session (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Simulation frame rate
    pub fps: u32,
    /// Playfield size
    pub bounds: Vec2,
    /// Stage frame counter, wraps at `TIMER_WRAP`
    pub timer: u32,
    /// Simulated frames since the session started (never wraps, frozen while paused)
    pub time_ticks: u64,
    pub player: Player,
    pub boss: Boss,
    /// Player shots, in creation order
    pub(super) shots: Vec<Shot>,
    /// Falling and shooting stars, in creation order
    pub(super) stars: Vec<Star>,
    pub(super) breakers: Vec<ShockerBreaker>,
    pub(super) bomb: Option<StarBomb>,
    params: StageParams,
    counts: LiveCounts,
    pub hit_policy: HitPolicy,
    pub paused: bool,
    pub pause_menu: PauseMenu,
    /// Scrolling background offset in `[0, height)`
    pub background_offset: f32,
    /// A bomb was spawned during this frame's logic phase
    pub bomb_spawned: bool,
    pub outcome: Option<GameOutcome>,
    /// Outbox for audio/UI, drained by the frontend
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Reference playfield at the default frame rate
    pub fn new(seed: u64) -> Self {
        Self::with_config(
            seed,
            DEFAULT_FPS,
            Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            HitPolicy::default(),
        )
    }

    pub fn with_config(seed: u64, fps: u32, bounds: Vec2, hit_policy: HitPolicy) -> Self {
        let fps = fps.max(MIN_FPS);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fps,
            bounds,
            timer: 0,
            time_ticks: 0,
            player: Player::new(bounds, fps),
            boss: Boss::new(bounds),
            shots: Vec::new(),
            stars: Vec::new(),
            breakers: Vec::new(),
            bomb: None,
            params: OPENING_STAGE,
            counts: LiveCounts::default(),
            hit_policy,
            paused: false,
            pause_menu: PauseMenu::new(bounds),
            background_offset: 0.0,
            bomb_spawned: false,
            outcome: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Injected random source for spawn decisions
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Context handed to entity logic and motion this frame
    pub fn frame_context(&self) -> FrameContext {
        FrameContext {
            timer: self.timer,
            fps: self.fps,
            bounds: self.bounds,
            player_anchor: self.player.anchor(),
            bomb_spawned: self.bomb_spawned,
        }
    }

    /// Reconfigure hazard spawning.
    ///
    /// Invalid input is rejected and the previous configuration stays active.
    pub fn update_stage(
        &mut self,
        bomb_frequency: u32,
        breaker_limit: u32,
        max_stars: u32,
        falling_star_chance: f32,
        shooting_star_chance: f32,
        breaker_chance: f32,
    ) -> Result<(), StageError> {
        self.apply_stage(StageParams::new(
            bomb_frequency,
            breaker_limit,
            max_stars,
            falling_star_chance,
            shooting_star_chance,
            breaker_chance,
        ))
    }

    /// `update_stage` with a prepared parameter set
    pub fn apply_stage(&mut self, params: StageParams) -> Result<(), StageError> {
        if let Err(e) = params.validate() {
            log::warn!("Rejected stage update {:?}: {}", params, e);
            return Err(e);
        }
        log::debug!("Stage updated: {:?}", params);
        self.params = params;
        Ok(())
    }

    pub fn stage_params(&self) -> StageParams {
        self.params
    }

    pub fn live_counts(&self) -> LiveCounts {
        self.counts
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn breakers(&self) -> &[ShockerBreaker] {
        &self.breakers
    }

    pub fn bomb(&self) -> Option<&StarBomb> {
        self.bomb.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn spawn_shot(&mut self) {
        let id = self.next_entity_id();
        let shot = Shot::new(id, self.player.muzzle(), self.bounds, self.hit_policy);
        self.shots.push(shot);
        self.counts.shots += 1;
    }

    pub fn spawn_falling_star(&mut self) {
        let ctx = self.frame_context();
        let id = self.next_entity_id();
        let star = FallingStar::spawn(id, &ctx, &mut self.rng);
        self.stars.push(Star::Falling(star));
        self.counts.stars += 1;
    }

    /// Place a falling star centred on `center`
    pub fn spawn_falling_star_at(&mut self, center: Vec2) {
        let ctx = self.frame_context();
        let id = self.next_entity_id();
        self.stars.push(Star::Falling(FallingStar::at(id, center, &ctx)));
        self.counts.stars += 1;
    }

    pub fn spawn_shooting_star(&mut self) {
        let ctx = self.frame_context();
        let id = self.next_entity_id();
        let star = ShootingStar::spawn(id, &ctx, &mut self.rng);
        self.stars.push(Star::Shooting(star));
        self.counts.stars += 1;
    }

    pub fn spawn_breaker(&mut self) {
        let ctx = self.frame_context();
        let id = self.next_entity_id();
        let breaker = ShockerBreaker::spawn(id, &ctx, &mut self.rng);
        self.breakers.push(breaker);
        self.counts.breakers += 1;
    }

    /// Spawn a bomb unless one is already live
    pub fn spawn_bomb(&mut self) -> bool {
        if self.bomb.is_some() {
            return false;
        }
        let ctx = self.frame_context();
        let id = self.next_entity_id();
        self.bomb = Some(StarBomb::spawn(id, &ctx, &mut self.rng));
        self.counts.bombs += 1;
        self.bomb_spawned = true;
        self.events.push(GameEvent::BombSpawned);
        log::info!("Star bomb spawned at frame {}", self.timer);
        true
    }

    /// Drop inactive entities and release their live-count slots
    pub fn purge_inactive(&mut self) {
        let before = self.shots.len();
        self.shots.retain(|s| s.is_active());
        self.counts.shots -= (before - self.shots.len()) as u32;

        let before = self.stars.len();
        self.stars.retain(|s| s.is_active());
        self.counts.stars -= (before - self.stars.len()) as u32;

        let before = self.breakers.len();
        self.breakers.retain(|b| b.is_active());
        self.counts.breakers -= (before - self.breakers.len()) as u32;

        if self.bomb.as_ref().is_some_and(|b| !b.is_active()) {
            self.bomb = None;
            self.counts.bombs -= 1;
        }
    }

    /// Record the terminal outcome (first one wins)
    pub fn finish(&mut self, outcome: GameOutcome) {
        if self.outcome.is_none() {
            log::info!("Game over after {} frames: {:?}", self.time_ticks, outcome);
            self.outcome = Some(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::stage::PHASE_4_STAGE;

    #[test]
    fn test_new_state() {
        let state = GameState::new(7);
        assert_eq!(state.stage_params(), OPENING_STAGE);
        assert_eq!(state.live_counts(), LiveCounts::default());
        assert!(!state.paused);
        assert!(!state.pause_menu.quit.is_visible());
        assert!(state.outcome.is_none());
    }

    #[test]
    fn test_pause_menu_layout() {
        let menu = PauseMenu::new(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        assert_eq!(menu.quit.rect(), Rect::new(640.0, 270.0, 640.0, 216.0));
        assert_eq!(menu.resume.rect(), Rect::new(640.0, 594.0, 640.0, 216.0));
    }

    #[test]
    fn test_update_stage_round_trip() {
        let mut state = GameState::new(7);
        state.update_stage(10, 6, 14, 0.045, 0.04, 0.006).unwrap();
        assert_eq!(state.stage_params(), PHASE_4_STAGE);

        let json = serde_json::to_string(&state.stage_params()).unwrap();
        let restored: StageParams = serde_json::from_str(&json).unwrap();
        let mut other = GameState::new(8);
        other.apply_stage(restored).unwrap();
        assert_eq!(other.stage_params(), state.stage_params());
    }

    #[test]
    fn test_update_stage_rejects_invalid() {
        let mut state = GameState::new(7);
        assert!(state.update_stage(10, 6, 14, 1.2, 0.04, 0.006).is_err());
        assert!(state.update_stage(0, 6, 14, 0.1, 0.04, 0.006).is_err());
        assert_eq!(state.stage_params(), OPENING_STAGE);
    }

    #[test]
    fn test_live_counts_track_purges() {
        let mut state = GameState::new(7);
        state.spawn_falling_star();
        state.spawn_shooting_star();
        state.spawn_breaker();
        state.spawn_shot();
        assert!(state.spawn_bomb());
        assert!(!state.spawn_bomb());
        assert_eq!(
            state.live_counts(),
            LiveCounts {
                shots: 1,
                stars: 2,
                breakers: 1,
                bombs: 1
            }
        );

        // Breakers expire on their own after 1.12 seconds
        let ctx = state.frame_context();
        for _ in 0..ctx.frames(1.2) {
            state.breakers[0].logic(&ctx, &mut Vec::new());
        }
        state.purge_inactive();
        assert_eq!(state.live_counts().breakers, 0);
        assert!(state.breakers.is_empty());
        assert_eq!(state.live_counts().stars, state.stars.len() as u32);
    }

    #[test]
    fn test_placed_star_is_released_by_purge() {
        let mut state = GameState::new(7);
        // Already past the bottom edge, so its first logic pass retires it
        state.spawn_falling_star_at(Vec2::new(100.0, SCREEN_HEIGHT + 500.0));
        assert_eq!(state.live_counts().stars, 1);
        assert_eq!(state.stars().len(), 1);

        crate::sim::tick::tick(&mut state, &crate::sim::tick::TickInput::default());
        assert!(state.stars().iter().all(|s| s.is_active()));
        assert_eq!(state.live_counts().stars as usize, state.stars().len());
    }

    #[test]
    fn test_first_outcome_wins() {
        let mut state = GameState::new(7);
        state.finish(GameOutcome::Lost);
        state.finish(GameOutcome::Interrupted);
        assert_eq!(state.outcome, Some(GameOutcome::Lost));
    }
}
