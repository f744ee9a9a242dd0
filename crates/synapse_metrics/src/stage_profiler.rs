//! Accumulated timings per simulation stage

use crate::Stage;
use std::time::Duration;

/// Total time and invocation count for one stage.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StageTiming {
    pub total: Duration,
    pub calls: u64,
}

impl StageTiming {
    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.total / self.calls as u32
        }
    }
}

/// Stage-indexed array instead of a name-keyed map so recording never
/// allocates inside the frame loop.
#[derive(Debug, Default)]
pub struct StageProfiler {
    timings: [StageTiming; Stage::COUNT],
}

impl StageProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        let slot = &mut self.timings[stage.index()];
        slot.total += elapsed;
        slot.calls += 1;
    }

    pub fn timing(&self, stage: Stage) -> StageTiming {
        self.timings[stage.index()]
    }

    pub fn reset(&mut self) {
        self.timings = Default::default();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, StageTiming)> + '_ {
        Stage::ALL.iter().map(move |&stage| (stage, self.timings[stage.index()]))
    }
}
