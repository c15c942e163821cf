//! Engines and the top-level mode dispatcher
//!
//! Each engine runs one screen (menu, cutscene or game) and reports how it
//! ended. The controller turns that report into the next mode and runs it,
//! in a loop, until the session is over.

use glam::Vec2;

use crate::audio::{AudioManager, MusicTrack};
use crate::cutscene::{Cutscene, CutsceneKind};
use crate::platform::{FrameClock, InputSource, InputView};
use crate::renderer::{Canvas, Draw, DrawCommand, colors, render_cutscene, render_frame};
use crate::settings::Settings;
use crate::sim::entity::FrameContext;
use crate::sim::events::{GameEvent, SoundCue};
use crate::sim::geom::Rect;
use crate::sim::state::{GameOutcome, GameState};
use crate::sim::tick::{TickInput, tick};
use crate::ui::{Button, Slider};

/// Which engine is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    CutsceneIntro,
    Game,
    CutsceneLost,
    CutsceneWon { flawless: bool },
    Over,
}

impl Mode {
    pub fn after_menu(choice: MenuChoice) -> Mode {
        match choice {
            MenuChoice::Cutscene => Mode::CutsceneIntro,
            MenuChoice::Game => Mode::Game,
            MenuChoice::Quit => Mode::Over,
        }
    }

    /// Only a finished intro leads anywhere but the end
    pub fn after_cutscene(kind: CutsceneKind, exit: CutsceneExit) -> Mode {
        match (kind, exit) {
            (CutsceneKind::Intro, CutsceneExit::Finished) => Mode::Game,
            _ => Mode::Over,
        }
    }

    pub fn after_game(outcome: GameOutcome) -> Mode {
        match outcome {
            GameOutcome::Lost => Mode::CutsceneLost,
            GameOutcome::Won { flawless } => Mode::CutsceneWon { flawless },
            GameOutcome::Interrupted => Mode::Over,
        }
    }
}

/// Menu buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Cutscene,
    Game,
    Quit,
}

/// Title menu: three buttons and the music volume slider
#[derive(Debug, Clone)]
pub struct MenuEngine {
    bounds: Vec2,
    buttons: [(MenuChoice, Button); 3],
    volume: Slider,
    volume_changed: Option<f32>,
    background_offset: f32,
    events: Vec<GameEvent>,
}

impl MenuEngine {
    pub fn new(bounds: Vec2, music_volume: f32) -> Self {
        let (w, h) = (bounds.x, bounds.y);
        let x = (w / 2.0).floor() - (w / 5.0).floor();
        let top = (h / 2.0).floor() - (h / 2.5).floor();
        let (bw, bh) = ((2.0 * w / 5.0).floor(), (2.0 * h / 8.0).floor());
        let button = |y: f32, label| Button::new(Rect::new(x, y, bw, bh), label);
        Self {
            bounds,
            buttons: [
                (MenuChoice::Cutscene, button(top, "Begin Cutscene")),
                (MenuChoice::Game, button(top + 30.0 + bh, "Begin")),
                (MenuChoice::Quit, button(top + 60.0 + 2.0 * bh, "QUIT")),
            ],
            volume: Slider::new(
                Rect::new(
                    (w / 9.0).floor(),
                    top + 30.0 + bh + (h / 8.0).floor(),
                    (w / 6.0).floor(),
                    (h / 34.0).floor(),
                ),
                music_volume,
            ),
            volume_changed: None,
            background_offset: 0.0,
            events: Vec::new(),
        }
    }

    pub fn button(&self, choice: MenuChoice) -> &Button {
        let index = match choice {
            MenuChoice::Cutscene => 0,
            MenuChoice::Game => 1,
            MenuChoice::Quit => 2,
        };
        &self.buttons[index].1
    }

    pub fn slider(&self) -> &Slider {
        &self.volume
    }

    /// Music volume picked on the slider since the last call
    pub fn take_volume_change(&mut self) -> Option<f32> {
        self.volume_changed.take()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// One menu frame. Returns the pressed button, if any.
    pub fn update(&mut self, input: &TickInput) -> Option<MenuChoice> {
        self.background_offset += 1.0;
        if self.background_offset >= self.bounds.y {
            self.background_offset = 0.0;
        }
        if input.quit {
            return Some(MenuChoice::Quit);
        }

        if self.volume.drag(input.pointer, input.click) {
            self.volume_changed = Some(self.volume.value() / 100.0);
        }

        let mut pressed = None;
        for (choice, button) in self.buttons.iter_mut() {
            if button.update_hover(input.pointer) {
                self.events.push(SoundCue::MenuHover.into());
            }
            if pressed.is_none() && button.is_clicked(input.pointer, input.click) {
                self.events.push(SoundCue::MenuPress.into());
                pressed = Some(*choice);
            }
        }
        pressed
    }

    pub fn render(&self, fps: u32, canvas: &mut dyn Canvas) {
        let ctx = FrameContext::new(fps, self.bounds);
        canvas.submit(DrawCommand::Clear(colors::BACKGROUND));
        canvas.submit(DrawCommand::Background {
            offset: self.background_offset,
            height: self.bounds.y,
        });
        for (_, button) in &self.buttons {
            button.draw(&ctx, canvas);
        }
        self.volume.draw(&ctx, canvas);
        canvas.present();
    }
}

/// How a cutscene ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutsceneExit {
    /// Played out or closed with its end button
    Finished,
    Quit,
}

/// Plays one cutscene timeline
#[derive(Debug, Clone)]
pub struct CutsceneEngine {
    scene: Cutscene,
    events: Vec<GameEvent>,
}

impl CutsceneEngine {
    pub fn new(kind: CutsceneKind, fps: u32, bounds: Vec2) -> Self {
        Self {
            scene: Cutscene::new(kind, fps, bounds),
            events: Vec::new(),
        }
    }

    pub fn scene(&self) -> &Cutscene {
        &self.scene
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn update(&mut self, input: &TickInput) -> Option<CutsceneExit> {
        if input.quit {
            self.scene.end();
            return Some(CutsceneExit::Quit);
        }
        self.scene.handle_pointer(input.pointer, input.click, &mut self.events);
        if !self.scene.done() {
            self.scene.update();
        }
        self.scene.done().then_some(CutsceneExit::Finished)
    }
}

/// One boss fight
#[derive(Debug, Clone)]
pub struct GameEngine {
    state: GameState,
    /// Simulated frames after which the session is interrupted
    max_frames: Option<u64>,
}

impl GameEngine {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            state: GameState::with_config(seed, settings.fps, settings.bounds(), settings.hit_policy),
            max_frames: settings.max_frames,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Run one frame. Returns the outcome once the session has ended.
    pub fn update(&mut self, input: &TickInput) -> Option<GameOutcome> {
        tick(&mut self.state, input);
        if let Some(max) = self.max_frames {
            if self.state.outcome.is_none() && self.state.time_ticks >= max {
                log::info!("Frame limit {} reached", max);
                self.state.finish(GameOutcome::Interrupted);
            }
        }
        self.state.outcome
    }
}

/// Runs engines one after another until the session is over
pub struct Controller {
    settings: Settings,
    audio: AudioManager,
    clock: FrameClock,
    mode: Mode,
    seed: u64,
    outcome: Option<GameOutcome>,
    history: Vec<Mode>,
}

impl Controller {
    pub fn new(settings: Settings, mut audio: AudioManager) -> Self {
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        let seed = settings.resolve_seed();
        Self {
            clock: FrameClock::new(settings.fps, settings.pace_frames),
            settings,
            audio,
            mode: Mode::Menu,
            seed,
            outcome: None,
            history: Vec::new(),
        }
    }

    /// Start somewhere other than the menu
    pub fn starting_at(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    /// Modes entered so far, in order
    pub fn history(&self) -> &[Mode] {
        &self.history
    }

    /// Frames run across all engines
    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }

    /// Run until `Mode::Over`. Returns the outcome of the last game played.
    pub fn run(&mut self, input: &mut dyn InputSource, canvas: &mut dyn Canvas) -> Option<GameOutcome> {
        log::info!(
            "Starting in {:?} (seed {}, {} fps, {}x{})",
            self.mode,
            self.seed,
            self.settings.fps,
            self.settings.width,
            self.settings.height
        );
        while self.mode != Mode::Over {
            let next = match self.mode {
                Mode::Menu => self.run_menu(input, canvas),
                Mode::CutsceneIntro => self.run_cutscene(CutsceneKind::Intro, input, canvas),
                Mode::Game => self.run_game(input, canvas),
                Mode::CutsceneLost => self.run_cutscene(CutsceneKind::Lost, input, canvas),
                Mode::CutsceneWon { flawless } => {
                    self.run_cutscene(CutsceneKind::Won { flawless }, input, canvas)
                }
                Mode::Over => Mode::Over,
            };
            log::info!("{:?} -> {:?}", self.mode, next);
            self.history.push(next);
            self.mode = next;
        }
        self.audio.stop_music();
        self.outcome
    }

    fn run_menu(&mut self, input: &mut dyn InputSource, canvas: &mut dyn Canvas) -> Mode {
        let mut menu = MenuEngine::new(self.settings.bounds(), self.audio.music_volume());
        self.audio.play_music(MusicTrack::Menu);
        loop {
            let frame = input.poll(InputView::Menu(&menu));
            let choice = menu.update(&frame);
            if let Some(volume) = menu.take_volume_change() {
                self.audio.set_music_volume(volume);
            }
            self.audio.handle_events(&menu.drain_events());
            menu.render(self.settings.fps, canvas);
            self.clock.wait();

            if let Some(choice) = choice {
                self.audio.stop_music();
                return Mode::after_menu(choice);
            }
        }
    }

    fn run_cutscene(&mut self, kind: CutsceneKind, input: &mut dyn InputSource, canvas: &mut dyn Canvas) -> Mode {
        let mut engine = CutsceneEngine::new(kind, self.settings.fps, self.settings.bounds());
        match kind {
            CutsceneKind::Intro => self.audio.stop_music(),
            CutsceneKind::Lost => self.audio.play_music(MusicTrack::GameOver),
            CutsceneKind::Won { .. } => self.audio.play_music(MusicTrack::Ending),
        }
        loop {
            let frame = input.poll(InputView::Cutscene(engine.scene()));
            let exit = engine.update(&frame);
            self.audio.handle_events(&engine.drain_events());
            render_cutscene(engine.scene(), canvas);
            self.clock.wait();

            if let Some(exit) = exit {
                self.audio.stop_music();
                return Mode::after_cutscene(kind, exit);
            }
        }
    }

    fn run_game(&mut self, input: &mut dyn InputSource, canvas: &mut dyn Canvas) -> Mode {
        let mut engine = GameEngine::new(&self.settings, self.seed);
        self.audio.play_music(MusicTrack::Battle);
        loop {
            let frame = input.poll(InputView::Game(engine.state()));
            let outcome = engine.update(&frame);
            self.audio.handle_events(&engine.drain_events());
            render_frame(engine.state(), canvas);
            self.clock.wait();

            if let Some(outcome) = outcome {
                self.audio.stop_music();
                self.outcome = Some(outcome);
                return Mode::after_game(outcome);
            }
        }
    }
}
