//! Simulation time
//!
//! The field is driven by elapsed wall-clock time handed in by the render
//! loop; the clock here only tracks frames and the latest elapsed value.

use std::time::{Duration, Instant};

/// Source of elapsed time since the visual component started.
pub trait TimeSource {
    fn elapsed(&self) -> Duration;

    /// Move on to the next frame and return its elapsed time.
    fn next_frame(&mut self) -> Duration {
        self.elapsed()
    }
}

/// Wall clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Fixed-step clock for headless runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct SteppedClock {
    step: Duration,
    now: Duration,
}

impl SteppedClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            now: Duration::ZERO,
        }
    }

    /// 60 Hz steps.
    pub fn display_rate() -> Self {
        Self::new(Duration::from_micros(16_666))
    }

    pub fn advance(&mut self) -> Duration {
        self.now += self.step;
        self.now
    }
}

impl TimeSource for SteppedClock {
    fn elapsed(&self) -> Duration {
        self.now
    }

    fn next_frame(&mut self) -> Duration {
        self.advance()
    }
}

/// Frame counter plus the simulation time of the latest frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationTime {
    frame_count: u64,
    seconds: f32,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    /// Start a new frame at `elapsed` and return its frame number (1-based).
    pub fn advance_to(&mut self, elapsed: Duration) -> u64 {
        self.frame_count += 1;
        self.seconds = elapsed.as_secs_f32();
        self.frame_count
    }
}
