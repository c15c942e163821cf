//! Input sources
//!
//! The controller asks its input source for one `TickInput` per frame and
//! shows it what the active engine looks like, so a source can aim the
//! pointer at buttons or react to the playfield.

use std::collections::VecDeque;

use glam::Vec2;

use crate::controller::{MenuChoice, MenuEngine};
use crate::cutscene::Cutscene;
use crate::sim::entity::Entity;
use crate::sim::state::GameState;
use crate::sim::tick::TickInput;

/// What the active engine exposes to input sources
#[derive(Clone, Copy)]
pub enum InputView<'a> {
    Menu(&'a MenuEngine),
    Cutscene(&'a Cutscene),
    Game(&'a GameState),
}

/// Produces the input for each frame
pub trait InputSource {
    fn poll(&mut self, view: InputView<'_>) -> TickInput;
}

/// Plays back a fixed list of inputs, then requests quit
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<TickInput>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Queue `count` copies of `input`
    pub fn repeat(mut self, input: TickInput, count: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(input, count));
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _view: InputView<'_>) -> TickInput {
        self.frames.pop_front().unwrap_or(TickInput {
            quit: true,
            ..Default::default()
        })
    }
}

/// Horizontal distance at which a falling hazard is worth dodging
const DODGE_RANGE: f32 = 180.0;
/// Extra clearance kept around breaker columns and bomb blasts
const DODGE_MARGIN: f32 = 60.0;
/// No steering while this close to the boss
const AIM_DEADZONE: f32 = 20.0;

/// Plays the game on its own: starts from the menu, fires continuously,
/// steps away from the nearest threat and otherwise lines up with the boss.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Pick "Begin Cutscene" instead of "Begin" in the menu
    watch_intro: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watching_intro(mut self, watch: bool) -> Self {
        self.watch_intro = watch;
        self
    }

    fn press(center: Vec2) -> TickInput {
        TickInput {
            pointer: Some(center),
            click: true,
            ..Default::default()
        }
    }

    fn drive(&self, state: &GameState) -> TickInput {
        if state.paused {
            return TickInput {
                escape: true,
                ..Default::default()
            };
        }

        let player = state.player.center();
        let nearer = |threat: Option<f32>, x: f32| match threat {
            Some(t) if (t - player.x).abs() <= (x - player.x).abs() => Some(t),
            _ => Some(x),
        };

        let mut threat = None;
        for star in state.stars().iter().filter(|s| s.is_active()) {
            let c = star.center();
            if c.y > state.bounds.y * 0.4 && (c.x - player.x).abs() < DODGE_RANGE {
                threat = nearer(threat, c.x);
            }
        }
        for breaker in state.breakers().iter().filter(|b| b.is_active()) {
            let column = breaker.column();
            if player.x >= column.left() - DODGE_MARGIN && player.x <= column.right() + DODGE_MARGIN {
                threat = nearer(threat, column.center().x);
            }
        }
        if let Some(bomb) = state.bomb().filter(|b| b.is_active()) {
            let c = bomb.blast_center();
            if c.distance(player) < bomb.blast_radius() + DODGE_MARGIN {
                threat = nearer(threat, c.x);
            }
        }

        let mut direction = match threat {
            Some(x) if x > player.x => -1,
            Some(_) => 1,
            None => {
                let dx = state.boss.center().x - player.x;
                if dx.abs() < AIM_DEADZONE { 0 } else { dx.signum() as i32 }
            }
        };
        // Cornered: run the other way
        let rect = state.player.sprite_rect();
        if (direction < 0 && rect.left() <= 0.0) || (direction > 0 && rect.right() >= state.bounds.x) {
            direction = -direction;
        }

        TickInput {
            left: direction < 0,
            right: direction > 0,
            shoot: true,
            ..Default::default()
        }
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, view: InputView<'_>) -> TickInput {
        match view {
            InputView::Menu(menu) => {
                let choice = if self.watch_intro {
                    MenuChoice::Cutscene
                } else {
                    MenuChoice::Game
                };
                Self::press(menu.button(choice).rect().center())
            }
            InputView::Cutscene(scene) => match scene.end_button() {
                Some(button) if Some(scene.step()) == scene.max_step() => {
                    Self::press(button.rect().center())
                }
                _ => TickInput::default(),
            },
            InputView::Game(state) => self.drive(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_runs_out_into_quit() {
        let mut script = ScriptedInput::default().repeat(
            TickInput {
                shoot: true,
                ..Default::default()
            },
            2,
        );
        let state = GameState::new(1);
        assert!(script.poll(InputView::Game(&state)).shoot);
        assert!(script.poll(InputView::Game(&state)).shoot);
        assert_eq!(script.remaining(), 0);
        assert!(script.poll(InputView::Game(&state)).quit);
    }

    #[test]
    fn test_autopilot_fires_and_aims_at_boss() {
        let mut pilot = Autopilot::new();
        let state = GameState::new(1);
        let input = pilot.poll(InputView::Game(&state));
        assert!(input.shoot);
        assert!(!input.quit);
    }

    #[test]
    fn test_autopilot_dodges_falling_star() {
        let mut pilot = Autopilot::new();
        let mut state = GameState::new(1);
        let player = state.player.center();
        // Just right of the player, low on the screen
        state.spawn_falling_star_at(Vec2::new(player.x + 40.0, player.y - 200.0));

        let input = pilot.poll(InputView::Game(&state));
        assert!(input.left);
        assert!(!input.right);
    }

    #[test]
    fn test_autopilot_resumes_when_paused() {
        let mut pilot = Autopilot::new();
        let mut state = GameState::new(1);
        state.paused = true;
        assert!(pilot.poll(InputView::Game(&state)).escape);
    }
}
