//! Game settings
//!
//! Read from a JSON file; every field is optional and falls back to its
//! default.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::sim::collision::HitPolicy;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation frame rate
    pub fps: u32,
    /// Playfield size
    pub width: f32,
    pub height: f32,
    /// RNG seed; derived from the clock when absent
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0), edited by the menu slider
    pub music_volume: f32,

    /// When a projectile's hit guard is consumed
    pub hit_policy: HitPolicy,
    /// Sleep to hold the frame rate
    pub pace_frames: bool,
    /// Interrupt a game after this many simulated frames
    pub max_frames: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            seed: None,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.05,

            hit_policy: HitPolicy::default(),
            pace_frames: true,
            max_frames: None,
        }
    }
}

impl Settings {
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// The configured seed, or one taken from the wall clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.fps < MIN_FPS {
            return Err(SettingsError::Invalid(format!(
                "fps must be at least {MIN_FPS}, got {}",
                self.fps
            )));
        }
        if !(self.width.is_finite() && self.width >= MIN_SCREEN_WIDTH)
            || !(self.height.is_finite() && self.height >= MIN_SCREEN_HEIGHT)
        {
            return Err(SettingsError::Invalid(format!(
                "screen size must be at least {MIN_SCREEN_WIDTH}x{MIN_SCREEN_HEIGHT}, got {}x{}",
                self.width, self.height
            )));
        }
        for (name, value) in [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
            ("music_volume", self.music_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::Invalid(format!("{name} must be within 0..=1, got {value}")));
            }
        }
        Ok(())
    }

    /// Read and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Like `load`, but any failure falls back to the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.as_ref().display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
