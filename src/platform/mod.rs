//! Platform abstraction layer
//!
//! Handles the host side of the game loop:
//! - Input sources (scripted playback, the autopilot)
//! - Frame pacing

pub mod input;
pub mod time;

pub use input::{Autopilot, InputSource, InputView, ScriptedInput};
pub use time::FrameClock;
