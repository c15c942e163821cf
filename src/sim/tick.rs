//! Fixed timestep stage director
//!
//! One call to `tick` runs one frame in a fixed phase order:
//! input, throttled collision resolution, motion, logic + spawning, terminal
//! check. Rendering happens outside the simulation between `tick` calls.

use glam::Vec2;
use rand::Rng;

use super::collision::{CollisionGrid, resolve_projectiles};
use super::entity::Entity;
use super::events::{GameEvent, SoundCue};
use super::state::{GameOutcome, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Move left held
    pub left: bool,
    /// Move right held
    pub right: bool,
    /// Shoot pressed this frame
    pub shoot: bool,
    /// Escape pressed this frame (pause toggle)
    pub escape: bool,
    /// Window close / quit request
    pub quit: bool,
    /// Pointer position, if known
    pub pointer: Option<Vec2>,
    /// Primary button pressed this frame
    pub click: bool,
}

impl TickInput {
    /// Horizontal direction in {-1, 0, 1}; right wins when both are held
    pub fn direction(&self) -> i32 {
        if self.right {
            1
        } else if self.left {
            -1
        } else {
            0
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_over() {
        return;
    }
    if input.quit {
        state.finish(GameOutcome::Interrupted);
        return;
    }

    if state.paused {
        tick_paused(state, input);
        return;
    }
    if input.escape {
        pause(state);
        return;
    }

    // Input
    state.player.set_direction(input.direction());
    if input.shoot && state.player.shoot(&mut state.events) {
        state.spawn_shot();
    }

    // Collision checks are throttled to every fps/10 frames
    let skip = (state.fps / COLLISION_DIVISOR).max(1);
    if state.timer % skip == 0 {
        resolve_collisions(state);
    }

    advance_all(state);
    run_logic(state);
    check_terminal(state);
}

fn pause(state: &mut GameState) {
    state.paused = true;
    state.pause_menu.show();
    state.events.push(GameEvent::Paused);
    log::info!("Paused at frame {}", state.time_ticks);
}

fn resume(state: &mut GameState) {
    state.paused = false;
    state.pause_menu.hide();
    state.events.push(GameEvent::Resumed);
    log::info!("Resumed at frame {}", state.time_ticks);
}

/// Menu-only input handling; simulation state stays frozen
fn tick_paused(state: &mut GameState, input: &TickInput) {
    let menu = &mut state.pause_menu;
    if menu.quit.update_hover(input.pointer) {
        state.events.push(SoundCue::MenuHover.into());
    }
    if menu.resume.update_hover(input.pointer) {
        state.events.push(SoundCue::MenuHover.into());
    }

    if input.escape {
        resume(state);
    } else if state.pause_menu.quit.is_clicked(input.pointer, input.click) {
        state.events.push(SoundCue::MenuPress.into());
        state.finish(GameOutcome::Interrupted);
    } else if state.pause_menu.resume.is_clicked(input.pointer, input.click) {
        resume(state);
    }
}

/// Grid pass for shots and stars, then breakers and the bomb against the player
pub fn resolve_collisions(state: &mut GameState) {
    let ctx = state.frame_context();
    let grid = CollisionGrid::build(CELL_SIZE, &state.shots, &state.stars);
    resolve_projectiles(
        &grid,
        &mut state.shots,
        &mut state.stars,
        &mut state.boss,
        &mut state.player,
        &ctx,
        &mut state.events,
    );
    for breaker in &mut state.breakers {
        breaker.collide(&mut state.player, &ctx, &mut state.events);
    }
    if let Some(bomb) = &mut state.bomb {
        bomb.collide(&mut state.player, &ctx, &mut state.events);
    }
}

fn advance_all(state: &mut GameState) {
    state.background_offset += BACKGROUND_SPEED;
    if state.background_offset >= state.bounds.y {
        state.background_offset = 0.0;
    }

    let ctx = state.frame_context();
    state.boss.advance(&ctx);
    state.player.advance(&ctx);
    for shot in &mut state.shots {
        shot.advance(&ctx);
    }
    for star in &mut state.stars {
        star.advance(&ctx);
    }
    for breaker in &mut state.breakers {
        breaker.advance(&ctx);
    }
    if let Some(bomb) = &mut state.bomb {
        bomb.advance(&ctx);
    }
}

fn run_logic(state: &mut GameState) {
    state.bomb_spawned = false;
    state.timer += 1;
    if state.timer >= TIMER_WRAP {
        state.timer = 0;
    }
    state.time_ticks += 1;

    let ctx = state.frame_context();
    for shot in &mut state.shots {
        shot.logic(&ctx, &mut state.events);
    }
    for star in &mut state.stars {
        star.logic(&ctx, &mut state.events);
    }
    for breaker in &mut state.breakers {
        breaker.logic(&ctx, &mut state.events);
    }
    if let Some(bomb) = &mut state.bomb {
        bomb.logic(&ctx, &mut state.events);
    }

    schedule_spawns(state);

    // Boss sees this frame's bomb spawn
    let ctx = state.frame_context();
    state.boss.logic(&ctx, &mut state.events);
    for params in state.boss.drain_stage_changes() {
        // Phase tables are validated constants
        let applied = state.apply_stage(params);
        debug_assert!(applied.is_ok(), "phase table rejected: {params:?}");
    }
    state.player.logic(&ctx, &mut state.events);

    state.purge_inactive();
}

/// Probabilistic hazard spawning plus the fixed-period bomb
pub fn schedule_spawns(state: &mut GameState) {
    let params = state.stage_params();
    let cadence = (state.fps / SPAWN_DIVISOR).max(1);

    if (state.timer / cadence) % 2 == 0 {
        let val = state.rng().random::<f32>();

        if state.live_counts().stars < params.max_stars && val < params.falling_star_chance {
            state.spawn_falling_star();
        }
        if state.live_counts().stars < params.max_stars && val < params.shooting_star_chance {
            state.spawn_shooting_star();
        }
        let breakers = state.live_counts().breakers;
        if breakers < params.breaker_limit && val < params.breaker_chance {
            for _ in breakers..params.breaker_limit {
                state.spawn_breaker();
            }
        }
    }

    let period = params.bomb_period_frames(state.fps);
    if state.bomb.is_none() && state.timer != 0 && state.timer as u64 % period == 0 {
        state.spawn_bomb();
    }
}

fn check_terminal(state: &mut GameState) {
    if !state.player.is_active() {
        state.finish(GameOutcome::Lost);
    } else if !state.boss.is_active() {
        let flawless = state.player.has_full_health();
        state.finish(GameOutcome::Won { flawless });
    }
}
