//! Scripted cutscene timelines
//!
//! A cutscene is a list of step durations. Only `done()`, `step()` and
//! `end()` matter to the controller; what each step shows is presentation.

use glam::Vec2;

use crate::sim::events::{GameEvent, SoundCue};
use crate::sim::geom::Rect;
use crate::ui::Button;

/// Which timeline is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutsceneKind {
    Intro,
    Lost,
    Won { flawless: bool },
}

/// Step durations in seconds
const INTRO_STEPS: [f32; 16] = [
    3.0, 5.5, 5.0, 6.5, 5.0, 6.5, 10.0, 6.0, 8.0, 13.0, 8.0, 6.5, 8.0, 6.0, 8.5, 6.0,
];
const LOST_STEPS: [f32; 3] = [3.0, 2.5, 3.5];
const WON_STEPS: [f32; 13] = [5.0, 3.0, 5.0, 5.0, 6.5, 3.5, 3.2, 3.0, 10.0, 5.5, 6.5, 4.0, 17.0];
const FLAWLESS_STEPS: [f32; 25] = [
    5.0, 3.0, 5.0, 5.0, 6.5, 3.0, 9.5, 10.0, 3.0, 7.0, 5.0, 3.0, 4.0, 10.0, 4.0, 9.0, 4.0, 3.0,
    8.0, 5.0, 6.0, 8.0, 8.0, 5.0, 7.5,
];

/// Final step hold before finishing on its own
const LOST_HOLD_SECS: f32 = 47.0;
const WON_HOLD_SECS: f32 = 134.0;

/// A playing cutscene
#[derive(Debug, Clone)]
pub struct Cutscene {
    kind: CutsceneKind,
    fps: u32,
    /// Frame length of each timed step
    steps: Vec<u32>,
    /// Frames the last step holds; `None` when the cutscene ends after the timed steps
    final_hold: Option<u32>,
    step: usize,
    timer: u32,
    end_button: Option<Button>,
    done: bool,
}

impl Cutscene {
    pub fn new(kind: CutsceneKind, fps: u32, bounds: Vec2) -> Self {
        let secs = |s: f32| (s * fps as f32).floor() as u32;
        let (durations, hold): (&[f32], Option<u32>) = match kind {
            CutsceneKind::Intro => (&INTRO_STEPS, None),
            CutsceneKind::Lost => (&LOST_STEPS, Some(secs(LOST_HOLD_SECS))),
            CutsceneKind::Won { flawless: false } => (&WON_STEPS, Some(secs(WON_HOLD_SECS) + 10)),
            CutsceneKind::Won { flawless: true } => {
                (&FLAWLESS_STEPS, Some(secs(WON_HOLD_SECS) + 10))
            }
        };
        let end_button = hold.map(|_| {
            let (w, h) = (bounds.x, bounds.y);
            let rect = Rect::new(
                (w / 2.0).floor() - (w / 6.0).floor(),
                h * 0.6,
                (w / 3.0).floor(),
                (h / 4.0).floor(),
            );
            Button::new(rect, "QUIT")
        });
        Self {
            kind,
            fps,
            steps: durations.iter().map(|&s| secs(s)).collect(),
            final_hold: hold,
            step: 0,
            timer: 0,
            end_button,
            done: false,
        }
    }

    pub fn kind(&self) -> CutsceneKind {
        self.kind
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// The step at which the end button becomes active
    pub fn max_step(&self) -> Option<usize> {
        self.final_hold.map(|_| self.steps.len())
    }

    pub fn end_button(&self) -> Option<&Button> {
        self.end_button.as_ref()
    }

    /// Frames spent in the current step
    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Finish immediately
    pub fn end(&mut self) {
        if !self.done {
            log::debug!("{:?} cutscene ended at step {}", self.kind, self.step);
        }
        self.done = true;
    }

    /// Advance one frame
    pub fn update(&mut self) {
        if self.done {
            return;
        }
        self.timer += 1;
        match self.steps.get(self.step) {
            Some(&duration) => {
                if self.timer > duration {
                    self.step += 1;
                    self.timer = 0;
                    log::trace!("{:?} cutscene step {}", self.kind, self.step);
                    if self.final_hold.is_none() && self.step == self.steps.len() {
                        self.done = true;
                    }
                }
            }
            None => {
                if self.final_hold.is_some_and(|hold| self.timer > hold) {
                    self.done = true;
                }
            }
        }
    }

    /// Pointer handling for the end button; a click only counts on the final step
    pub fn handle_pointer(&mut self, pointer: Option<Vec2>, click: bool, events: &mut Vec<GameEvent>) {
        let on_final = Some(self.step) == self.max_step();
        let Some(button) = self.end_button.as_mut() else {
            return;
        };
        if on_final && button.update_hover(pointer) {
            events.push(SoundCue::MenuHover.into());
        }
        if on_final && button.is_clicked(pointer, click) {
            events.push(SoundCue::MenuPress.into());
            self.end();
        }
    }
}
