//! Stage timing instrumentation
//!
//! An optional collector threaded into the generator only when debug output
//! is requested. It observes wall-clock time around each stage and nothing
//! else, so instrumentation can never perturb the deterministic grid.

use std::time::{Duration, Instant};

/// Wall-clock durations for each pipeline stage, in execution order.
#[derive(Debug, Default)]
pub struct StageTimings {
    stages: Vec<(&'static str, Duration)>,
}

impl StageTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f`, recording its elapsed time under `stage`.
    pub fn time<R>(&mut self, stage: &'static str, f: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let out = f();
        self.stages.push((stage, start.elapsed()));
        out
    }

    pub fn record(&mut self, stage: &'static str, elapsed: Duration) {
        self.stages.push((stage, elapsed));
    }

    pub fn stages(&self) -> &[(&'static str, Duration)] {
        &self.stages
    }

    pub fn total(&self) -> Duration {
        self.stages.iter().map(|(_, d)| *d).sum()
    }

    /// Stage durations as fractional milliseconds, for the debug payload.
    pub fn stage_millis(&self) -> Vec<(String, f64)> {
        self.stages
            .iter()
            .map(|(name, d)| (name.to_string(), d.as_secs_f64() * 1000.0))
            .collect()
    }
}
