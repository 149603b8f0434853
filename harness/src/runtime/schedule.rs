//! Arrival-rate ramp schedule
//!
//! A scenario's load profile is a small state machine over its stage list:
//! the state is (stage index, elapsed-in-stage), and the instantaneous rate
//! interpolates linearly from the previous stage's target to the current
//! one across the stage duration. Pure and independently testable; the
//! executor in `runner` only samples it.

use std::time::Duration;

/// One ramp stage: move the arrival rate to `target` over `duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub target: f64,
    pub duration: Duration,
}

impl Stage {
    pub fn new(target: f64, duration: Duration) -> Self {
        Self { target, duration }
    }
}

#[derive(Debug, Clone)]
pub struct RampSchedule {
    start_rate: f64,
    stages: Vec<Stage>,
}

impl RampSchedule {
    pub fn new(start_rate: f64, stages: Vec<Stage>) -> Self {
        Self { start_rate, stages }
    }

    /// Sum of all stage durations; the scenario terminates once this has
    /// elapsed.
    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|stage| stage.duration).sum()
    }

    /// Instantaneous target rate at `elapsed`, or `None` once the schedule
    /// has run out.
    ///
    /// Within a stage the rate interpolates linearly from the previous
    /// target (the start rate for the first stage). The final target holds
    /// at exactly the total-duration boundary; beyond it the scenario is
    /// over.
    pub fn rate_at(&self, elapsed: Duration) -> Option<f64> {
        let mut offset = Duration::ZERO;
        let mut previous = self.start_rate;

        for stage in &self.stages {
            let end = offset + stage.duration;
            if elapsed < end {
                let into = (elapsed - offset).as_secs_f64();
                let span = stage.duration.as_secs_f64();
                let fraction = if span > 0.0 { into / span } else { 1.0 };
                return Some(previous + (stage.target - previous) * fraction);
            }
            previous = stage.target;
            offset = end;
        }

        if !self.stages.is_empty() && elapsed == offset {
            return Some(previous);
        }
        None
    }
}
