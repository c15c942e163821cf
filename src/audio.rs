//! Audio cue playback
//!
//! The simulation only emits `GameEvent`s. The audio manager maps them to
//! cues with their relative volumes, mixes in the configured volumes and hands
//! them to a backend. Nothing here feeds back into the simulation.

use crate::sim::events::{GameEvent, SoundCue};

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    /// Main menu loop
    Menu,
    /// Boss fight theme
    Battle,
    /// Loop played while the game is paused
    Pause,
    /// Game over jingle
    GameOver,
    /// Ending theme
    Ending,
}

impl MusicTrack {
    /// Relative volume before the music mix is applied
    pub fn base_volume(self) -> f32 {
        match self {
            MusicTrack::Pause | MusicTrack::Ending => 0.2,
            _ => 1.0,
        }
    }
}

impl SoundCue {
    /// Relative volume of the cue before the configured mix is applied
    pub fn base_volume(self) -> f32 {
        match self {
            SoundCue::PlayerShoot => 0.02,
            SoundCue::PlayerHurt => 0.08,
            SoundCue::StarDing => 0.04,
            SoundCue::StarSqueak => 0.08,
            SoundCue::StarTwinkle => 0.01,
            SoundCue::BreakerStrike => 0.05,
            SoundCue::BombSummon => 0.05,
            SoundCue::BombExplosion => 0.1,
            SoundCue::BossHurt => 0.04,
            SoundCue::BossRoar => 0.2,
            SoundCue::BossPhaseShift | SoundCue::BossFinalPhase => 0.12,
            SoundCue::MenuHover => 0.05,
            SoundCue::MenuPress => 0.1,
        }
    }
}

/// Output device abstraction
pub trait AudioBackend {
    fn play_cue(&mut self, cue: SoundCue, volume: f32);
    fn play_music(&mut self, track: MusicTrack, volume: f32);
    fn set_music_volume(&mut self, volume: f32);
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    fn stop_music(&mut self);
    /// Start a loop on a second channel while the main track is paused
    fn play_overlay(&mut self, track: MusicTrack, volume: f32);
    fn stop_overlay(&mut self);
}

/// Backend for headless runs: every request becomes a debug log line
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_cue(&mut self, cue: SoundCue, volume: f32) {
        log::debug!("cue {:?} at {:.3}", cue, volume);
    }

    fn play_music(&mut self, track: MusicTrack, volume: f32) {
        log::debug!("music {:?} at {:.3}", track, volume);
    }

    fn set_music_volume(&mut self, volume: f32) {
        log::debug!("music volume {:.3}", volume);
    }

    fn pause_music(&mut self) {
        log::debug!("music paused");
    }

    fn resume_music(&mut self) {
        log::debug!("music resumed");
    }

    fn stop_music(&mut self) {
        log::debug!("music stopped");
    }

    fn play_overlay(&mut self, track: MusicTrack, volume: f32) {
        log::debug!("overlay {:?} at {:.3}", track, volume);
    }

    fn stop_overlay(&mut self) {
        log::debug!("overlay stopped");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    /// Track playing underneath the pause loop
    current_track: Option<MusicTrack>,
    paused: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(LogBackend))
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Some(backend),
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.05,
            muted: false,
            current_track: None,
            paused: false,
        }
    }

    /// A manager that drops everything
    pub fn disabled() -> Self {
        Self {
            backend: None,
            ..Self::new(Box::new(LogBackend))
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.refresh_music_volume();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0); the menu slider drives this
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.refresh_music_volume();
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.refresh_music_volume();
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }

    fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_music_volume(&self, track: MusicTrack) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume * track.base_volume()
        }
    }

    fn refresh_music_volume(&mut self) {
        if let Some(track) = self.current_track {
            let vol = self.effective_music_volume(track);
            if let Some(backend) = self.backend.as_mut() {
                backend.set_music_volume(vol);
            }
        }
    }

    /// Play a sound cue
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_sfx_volume() * cue.base_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.play_cue(cue, vol);
        }
    }

    pub fn play_music(&mut self, track: MusicTrack) {
        let vol = self.effective_music_volume(track);
        self.current_track = Some(track);
        self.paused = false;
        if let Some(backend) = self.backend.as_mut() {
            backend.play_music(track, vol);
        }
    }

    pub fn stop_music(&mut self) {
        self.current_track = None;
        self.paused = false;
        if let Some(backend) = self.backend.as_mut() {
            backend.stop_music();
        }
    }

    /// React to one frame's simulation output
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Sound(cue) => self.play(*cue),
                GameEvent::Paused => self.on_pause(),
                GameEvent::Resumed => self.on_resume(),
                GameEvent::PhaseChanged(_) | GameEvent::BombSpawned => {}
            }
        }
    }

    fn on_pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        let vol = self.effective_music_volume(MusicTrack::Pause);
        if let Some(backend) = self.backend.as_mut() {
            backend.pause_music();
            backend.play_overlay(MusicTrack::Pause, vol);
        }
    }

    fn on_resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        if let Some(backend) = self.backend.as_mut() {
            backend.stop_overlay();
            backend.resume_music();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Cue(SoundCue, f32),
        Music(MusicTrack),
        Volume(f32),
        Pause,
        Resume,
        Stop,
        Overlay(MusicTrack),
        StopOverlay,
    }

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<Call>>>);

    impl AudioBackend for Recorder {
        fn play_cue(&mut self, cue: SoundCue, volume: f32) {
            self.0.borrow_mut().push(Call::Cue(cue, volume));
        }
        fn play_music(&mut self, track: MusicTrack, _volume: f32) {
            self.0.borrow_mut().push(Call::Music(track));
        }
        fn set_music_volume(&mut self, volume: f32) {
            self.0.borrow_mut().push(Call::Volume(volume));
        }
        fn pause_music(&mut self) {
            self.0.borrow_mut().push(Call::Pause);
        }
        fn resume_music(&mut self) {
            self.0.borrow_mut().push(Call::Resume);
        }
        fn stop_music(&mut self) {
            self.0.borrow_mut().push(Call::Stop);
        }
        fn play_overlay(&mut self, track: MusicTrack, _volume: f32) {
            self.0.borrow_mut().push(Call::Overlay(track));
        }
        fn stop_overlay(&mut self) {
            self.0.borrow_mut().push(Call::StopOverlay);
        }
    }

    fn manager() -> (AudioManager, Rc<RefCell<Vec<Call>>>) {
        let recorder = Recorder::default();
        let calls = recorder.0.clone();
        (AudioManager::new(Box::new(recorder)), calls)
    }

    #[test]
    fn test_cue_volume_is_mixed() {
        let (mut audio, calls) = manager();
        audio.set_master_volume(0.5);
        audio.play(SoundCue::BossRoar);
        match calls.borrow().as_slice() {
            [Call::Cue(SoundCue::BossRoar, vol)] => assert!((vol - 0.1).abs() < 1e-6),
            other => panic!("unexpected calls: {other:?}"),
        }
    }

    #[test]
    fn test_muted_drops_cues() {
        let (mut audio, calls) = manager();
        audio.set_muted(true);
        audio.play(SoundCue::PlayerShoot);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_pause_and_resume_music() {
        let (mut audio, calls) = manager();
        audio.play_music(MusicTrack::Battle);
        audio.handle_events(&[GameEvent::Paused, GameEvent::Paused]);
        audio.handle_events(&[GameEvent::Resumed]);
        assert_eq!(
            calls.borrow().as_slice(),
            &[
                Call::Music(MusicTrack::Battle),
                Call::Pause,
                Call::Overlay(MusicTrack::Pause),
                Call::StopOverlay,
                Call::Resume,
            ]
        );
        assert_eq!(audio.current_track(), Some(MusicTrack::Battle));
    }

    #[test]
    fn test_slider_volume_reaches_backend() {
        let (mut audio, calls) = manager();
        audio.play_music(MusicTrack::Menu);
        audio.set_music_volume(0.5);
        assert!(matches!(calls.borrow().last(), Some(Call::Volume(v)) if (v - 0.4).abs() < 1e-6));
        audio.stop_music();
        assert_eq!(calls.borrow().last(), Some(&Call::Stop));
        assert!(audio.current_track().is_none());
    }

    #[test]
    fn test_disabled_manager_is_silent() {
        let mut audio = AudioManager::disabled();
        audio.play(SoundCue::MenuPress);
        audio.handle_events(&[GameEvent::Paused, GameEvent::Resumed]);
        assert_eq!(audio.music_volume(), 0.05);
    }
}
