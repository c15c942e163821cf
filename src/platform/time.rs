//! Fixed-rate frame pacing

use std::time::{Duration, Instant};

/// Frame times kept for the measured rate
const HISTORY: usize = 60;

/// Holds the loop at the configured frame rate
#[derive(Debug, Clone)]
pub struct FrameClock {
    fps: u32,
    pace: bool,
    frame: Duration,
    deadline: Option<Instant>,
    frames: u64,
    // Ring buffer of presentation times
    history: [Option<Instant>; HISTORY],
    index: usize,
}

impl FrameClock {
    /// `pace = false` never sleeps (headless runs and tests)
    pub fn new(fps: u32, pace: bool) -> Self {
        let fps = fps.max(1);
        Self {
            fps,
            pace,
            frame: Duration::from_secs_f64(1.0 / fps as f64),
            deadline: None,
            frames: 0,
            history: [None; HISTORY],
            index: 0,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn is_paced(&self) -> bool {
        self.pace
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Duration of one frame
    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// End the current frame, sleeping until the next frame boundary when paced
    pub fn wait(&mut self) {
        self.frames += 1;
        if !self.pace {
            return;
        }

        let now = Instant::now();
        let deadline = self.deadline.unwrap_or(now) + self.frame;
        if deadline > now {
            std::thread::sleep(deadline - now);
            self.deadline = Some(deadline);
        } else {
            // Fell behind: resync instead of bursting to catch up
            log::trace!("frame {} late by {:?}", self.frames, now - deadline);
            self.deadline = Some(now);
        }

        self.history[self.index] = Some(Instant::now());
        self.index = (self.index + 1) % HISTORY;
    }

    /// Frame rate measured over the last `HISTORY` paced frames
    pub fn measured_fps(&self) -> Option<f32> {
        let newest = self.history[(self.index + HISTORY - 1) % HISTORY]?;
        let oldest = self.history[self.index]?;
        let elapsed = newest.duration_since(oldest).as_secs_f32();
        (elapsed > 0.0).then(|| (HISTORY - 1) as f32 / elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpaced_clock_counts_without_sleeping() {
        let mut clock = FrameClock::new(60, false);
        let start = Instant::now();
        for _ in 0..1000 {
            clock.wait();
        }
        assert_eq!(clock.frames(), 1000);
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(clock.measured_fps().is_none());
    }

    #[test]
    fn test_paced_clock_holds_rate() {
        let mut clock = FrameClock::new(200, true);
        let start = Instant::now();
        for _ in 0..10 {
            clock.wait();
        }
        // Ten 5ms frames
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[test]
    fn test_zero_fps_is_clamped() {
        let clock = FrameClock::new(0, false);
        assert_eq!(clock.fps(), 1);
        assert_eq!(clock.frame_duration(), Duration::from_secs(1));
    }
}
