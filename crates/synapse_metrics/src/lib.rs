//! Synapse Metrics - frame and stage timing for the particle field
//!
//! Tracks how long each frame takes against the 60 Hz budget and how that
//! time splits across the simulation stages. Everything vanishes when the
//! `metrics` feature is off.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use synapse_metrics::{FrameTimer, Stage, StageProfiler};
//!
//! let mut timer = FrameTimer::new(120);
//! let mut stages = StageProfiler::new();
//! timer.begin();
//! synapse_metrics::time_stage!(stages, Stage::Motion, { /* move particles */ });
//! timer.end();
//! println!("FPS: {:.1}, over budget: {}", timer.fps(), timer.overruns());
//! ```

use std::time::Duration;

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod sample_window;
#[cfg(feature = "metrics")]
mod stage_profiler;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use sample_window::SampleWindow;
#[cfg(feature = "metrics")]
pub use stage_profiler::{StageProfiler, StageTiming};

/// Frame budget at a 60 Hz display refresh.
pub const FRAME_BUDGET: Duration = Duration::from_micros(16_666);

/// Per-frame work stages of the field simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Motion model over every particle plus point buffer write.
    Motion,
    /// Spatial grid clear + insert.
    GridRebuild,
    /// Neighbour scan and edge buffer fill.
    Adjacency,
}

impl Stage {
    pub const COUNT: usize = 3;
    pub const ALL: [Stage; Stage::COUNT] = [Stage::Motion, Stage::GridRebuild, Stage::Adjacency];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Stage::Motion => 0,
            Stage::GridRebuild => 1,
            Stage::Adjacency => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Stage::Motion => "motion",
            Stage::GridRebuild => "grid_rebuild",
            Stage::Adjacency => "adjacency",
        }
    }
}

// ============================================================================
// Macros for conditional compilation
// ============================================================================

/// Execute code only when metrics are enabled
#[macro_export]
macro_rules! metrics {
    ($($tt:tt)*) => {
        #[cfg(feature = "metrics")]
        {
            $($tt)*
        }
    };
}

/// Time a block against a stage (zero-cost when metrics disabled).
///
/// The `metrics` cfg is evaluated in the calling crate, so callers forward
/// their own `metrics` feature to `synapse_metrics/metrics`.
#[macro_export]
macro_rules! time_stage {
    ($profiler:expr, $stage:expr, $body:block) => {{
        #[cfg(feature = "metrics")]
        let stage_start = ::std::time::Instant::now();
        let stage_result = $body;
        #[cfg(feature = "metrics")]
        {
            $profiler.record($stage, stage_start.elapsed());
        }
        stage_result
    }};
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn fps(&self) -> f64 { 0.0 }
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn overruns(&self) -> u64 { 0 }
    pub fn frames(&self) -> u64 { 0 }
}

#[cfg(not(feature = "metrics"))]
pub struct SampleWindow<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> SampleWindow<T> {
    pub fn new(_capacity: usize) -> Self { Self(std::marker::PhantomData) }
    pub fn push(&mut self, _value: T) {}
    pub fn average(&self) -> T where T: Default { T::default() }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StageTiming {
    pub total: Duration,
    pub calls: u64,
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct StageProfiler;

#[cfg(not(feature = "metrics"))]
impl StageProfiler {
    pub fn new() -> Self { Self }
    pub fn record(&mut self, _stage: Stage, _elapsed: Duration) {}
    pub fn timing(&self, _stage: Stage) -> StageTiming { StageTiming::default() }
    pub fn reset(&mut self) {}
}
