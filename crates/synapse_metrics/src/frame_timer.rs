//! Frame timing against the display budget

use super::sample_window::SampleWindow;
use crate::FRAME_BUDGET;
use std::time::{Duration, Instant};

pub struct FrameTimer {
    frame_start: Instant,
    frame_times: SampleWindow<Duration>,
    overruns: u64,
    frames: u64,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            frame_start: Instant::now(),
            frame_times: SampleWindow::new(capacity),
            overruns: 0,
            frames: 0,
        }
    }

    pub fn begin(&mut self) {
        self.frame_start = Instant::now();
    }

    pub fn end(&mut self) {
        self.record(self.frame_start.elapsed());
    }

    /// Record an externally measured frame duration.
    pub fn record(&mut self, elapsed: Duration) {
        self.frames += 1;
        if elapsed > FRAME_BUDGET {
            self.overruns += 1;
        }
        self.frame_times.push(elapsed);
    }

    pub fn fps(&self) -> f64 {
        let avg = self.frame_times.average();
        if avg.as_secs_f64() > 0.0 {
            1.0 / avg.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_times.average().as_secs_f64() * 1000.0
    }

    pub fn frame_time_range_ms(&self) -> (f64, f64) {
        let (min, max) = self.frame_times.min_max();
        (min.as_secs_f64() * 1000.0, max.as_secs_f64() * 1000.0)
    }

    /// Frames that took longer than [`FRAME_BUDGET`].
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}
