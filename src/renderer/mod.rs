//! Draw-command rendering surface
//!
//! The simulation never draws. After each frame the frontend walks the state
//! and submits commands to a `Canvas`; a windowed backend would rasterize
//! them, the headless binary just counts them.

pub mod commands;
pub mod shapes;

pub use commands::{DrawCommand, Sprite, colors};
pub use shapes::Draw;

use crate::cutscene::Cutscene;
use crate::sim::entity::FrameContext;
use crate::sim::state::GameState;

/// Something that accepts draw commands for one frame
pub trait Canvas {
    fn submit(&mut self, command: DrawCommand);

    /// Frame finished
    fn present(&mut self) {}
}

/// Canvas that keeps the submitted commands
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for DrawList {
    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}

/// Draw one game frame: the scene while running, only the menu while paused
pub fn render_frame(state: &GameState, canvas: &mut dyn Canvas) {
    let ctx: FrameContext = state.frame_context();
    canvas.submit(DrawCommand::Clear(colors::BACKGROUND));

    if state.paused {
        state.pause_menu.quit.draw(&ctx, canvas);
        state.pause_menu.resume.draw(&ctx, canvas);
        canvas.present();
        return;
    }

    canvas.submit(DrawCommand::Background {
        offset: state.background_offset,
        height: state.bounds.y,
    });
    state.boss.draw(&ctx, canvas);
    for star in state.stars() {
        star.draw(&ctx, canvas);
    }
    for shot in state.shots() {
        shot.draw(&ctx, canvas);
    }
    for breaker in state.breakers() {
        breaker.draw(&ctx, canvas);
    }
    if let Some(bomb) = state.bomb() {
        bomb.draw(&ctx, canvas);
    }
    state.player.draw(&ctx, canvas);
    canvas.present();
}

/// Draw the current cutscene step
pub fn render_cutscene(scene: &Cutscene, canvas: &mut dyn Canvas) {
    canvas.submit(DrawCommand::Clear(colors::CUTSCENE));
    canvas.submit(DrawCommand::CutsceneStep {
        kind: scene.kind(),
        step: scene.step(),
        timer: scene.timer(),
    });
    if let Some(button) = scene.end_button() {
        if Some(scene.step()) == scene.max_step() {
            canvas.submit(DrawCommand::Button {
                rect: button.rect(),
                label: button.label(),
                hovered: button.is_hovered(),
            });
        }
    }
    canvas.present();
}
