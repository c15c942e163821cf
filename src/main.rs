//! Starfall entry point
//!
//! Runs the game headless: the autopilot plays from the menu to the end of
//! the closing cutscene while draw commands are counted instead of drawn.

use anyhow::Context;

use starfall::audio::AudioManager;
use starfall::platform::Autopilot;
use starfall::renderer::{Canvas, DrawCommand};
use starfall::{Controller, Settings};

/// Canvas that only counts what it is given
#[derive(Debug, Default)]
struct CountingCanvas {
    commands: u64,
    frames: u64,
}

impl Canvas for CountingCanvas {
    fn submit(&mut self, _command: DrawCommand) {
        self.commands += 1;
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().skip(1).find(|arg| !arg.starts_with("--")) {
        Some(path) => Settings::load(&path).with_context(|| format!("loading settings from {path}"))?,
        None => Settings::default(),
    };
    settings.validate()?;

    log::info!("Starfall starting...");
    let watch_intro = std::env::args().any(|arg| arg == "--intro");
    let mut controller = Controller::new(settings, AudioManager::default());
    let mut input = Autopilot::new().watching_intro(watch_intro);
    let mut canvas = CountingCanvas::default();

    let outcome = controller.run(&mut input, &mut canvas);
    log::info!(
        "Finished after {} frames ({} draw commands), outcome: {:?}",
        canvas.frames,
        canvas.commands,
        outcome
    );
    Ok(())
}
