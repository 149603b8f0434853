//! Arrival-rate scenario execution
//!
//! One driver task per scenario: sleep out the start offset, then tick the
//! ramp schedule, integrating the instantaneous rate into whole arrivals and
//! spawning one iteration task per arrival. Iterations are stateless and
//! independent; a semaphore of `max_vus` permits bounds how many run at
//! once, and arrivals that find no free VU are counted as dropped rather
//! than queued, keeping the open workload model honest.

use crate::runtime::schedule::{RampSchedule, Stage};
use crate::testing::AssertionResult;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio::time::{Instant, interval, sleep};

/// An iteration entry point: one stateless unit of work returning its
/// assertion outcome. Captures whatever shared handles it needs (client,
/// filters); the runner never passes state in.
pub type IterationFn = Arc<dyn Fn() -> BoxFuture<'static, AssertionResult> + Send + Sync>;

/// Declarative shape of one ramping-arrival-rate scenario.
#[derive(Debug, Clone)]
pub struct ScenarioSpec {
    pub name: String,
    /// Arrival rate at ramp start, in iterations per `time_unit`.
    pub start_rate: f64,
    pub time_unit: Duration,
    /// VU pool warm-up hint; the hard cap is `max_vus`.
    pub pre_allocated_vus: usize,
    pub max_vus: usize,
    /// Offset of this scenario's window relative to run start. Scenarios
    /// are not serialized; disjoint windows come from these offsets.
    pub start_time: Duration,
    pub stages: Vec<Stage>,
}

impl ScenarioSpec {
    pub fn schedule(&self) -> RampSchedule {
        RampSchedule::new(self.start_rate, self.stages.clone())
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|stage| stage.duration).sum()
    }
}

/// A spec bound to its entry point.
pub struct Scenario {
    pub spec: ScenarioSpec,
    pub entry: IterationFn,
}

/// Per-scenario outcome tally. Reporting only; failures never halt other
/// iterations or scenarios.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSummary {
    pub name: String,
    pub iterations: u64,
    pub passed: u64,
    pub failed: u64,
    /// Arrivals that found no free VU and were shed.
    pub dropped: u64,
    pub first_failure: Option<String>,
}

#[derive(Default)]
struct Counters {
    iterations: AtomicU64,
    passed: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
    first_failure: Mutex<Option<String>>,
}

pub struct ScenarioRunner {
    scenarios: Vec<Scenario>,
    tick: Duration,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::with_tick(Duration::from_millis(100))
    }

    /// Use a custom pacing tick. Shorter ticks smooth the ramp at the cost
    /// of scheduler churn.
    pub fn with_tick(tick: Duration) -> Self {
        Self {
            scenarios: Vec::new(),
            tick,
        }
    }

    pub fn add(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    /// Drive every scenario to completion and return summaries in the order
    /// the scenarios were added.
    pub async fn run(self) -> Vec<ScenarioSummary> {
        let tick = self.tick;
        let mut drivers = JoinSet::new();
        for (index, scenario) in self.scenarios.into_iter().enumerate() {
            drivers.spawn(async move { (index, drive_scenario(scenario, tick).await) });
        }

        let mut summaries = Vec::new();
        while let Some(result) = drivers.join_next().await {
            match result {
                Ok(indexed) => summaries.push(indexed),
                Err(e) => tracing::error!("❌ Scenario driver panicked: {e}"),
            }
        }
        summaries.sort_by_key(|(index, _)| *index);
        summaries.into_iter().map(|(_, summary)| summary).collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

async fn drive_scenario(scenario: Scenario, tick: Duration) -> ScenarioSummary {
    let spec = scenario.spec;

    if spec.start_time > Duration::ZERO {
        sleep(spec.start_time).await;
    }

    tracing::info!(
        "🚦 Scenario '{}' starting: ramp {:?}, {} pre-allocated VUs, {} max",
        spec.name,
        spec.total_duration(),
        spec.pre_allocated_vus,
        spec.max_vus
    );

    let schedule = RampSchedule::new(spec.start_rate, spec.stages.clone());
    let semaphore = Arc::new(Semaphore::new(spec.max_vus));
    let counters = Arc::new(Counters::default());
    let mut workers = JoinSet::new();

    // Iterations per tick = rate (per time_unit) scaled to the tick width.
    let unit = spec.time_unit.as_secs_f64();
    let unit = if unit > 0.0 { unit } else { 1.0 };

    let started = Instant::now();
    let mut ticker = interval(tick);
    let mut carried = 0.0_f64;

    loop {
        ticker.tick().await;
        let Some(rate) = schedule.rate_at(started.elapsed()) else {
            break;
        };

        carried += rate * tick.as_secs_f64() / unit;
        while carried >= 1.0 {
            carried -= 1.0;
            match semaphore.clone().try_acquire_owned() {
                Ok(permit) => {
                    let entry = scenario.entry.clone();
                    let counters = counters.clone();
                    let name = spec.name.clone();
                    workers.spawn(async move {
                        let outcome = entry().await;
                        counters.iterations.fetch_add(1, Ordering::Relaxed);
                        if outcome.success {
                            counters.passed.fetch_add(1, Ordering::Relaxed);
                        } else {
                            counters.failed.fetch_add(1, Ordering::Relaxed);
                            tracing::warn!("⚠️ [{name}] iteration failed: {}", outcome.describe());
                            let mut first = counters.first_failure.lock().await;
                            if first.is_none() {
                                *first = Some(outcome.describe());
                            }
                        }
                        drop(permit);
                    });
                }
                Err(_) => {
                    counters.dropped.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    // Ramp is over; let in-flight iterations finish.
    while workers.join_next().await.is_some() {}

    let summary = ScenarioSummary {
        name: spec.name.clone(),
        iterations: counters.iterations.load(Ordering::Relaxed),
        passed: counters.passed.load(Ordering::Relaxed),
        failed: counters.failed.load(Ordering::Relaxed),
        dropped: counters.dropped.load(Ordering::Relaxed),
        first_failure: counters.first_failure.lock().await.clone(),
    };

    tracing::info!(
        "🏁 Scenario '{}' finished: {} iterations ({} passed, {} failed, {} dropped arrivals)",
        summary.name,
        summary.iterations,
        summary.passed,
        summary.failed,
        summary.dropped
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_spec(name: &str, rate: f64, millis: u64, max_vus: usize) -> ScenarioSpec {
        ScenarioSpec {
            name: name.to_string(),
            start_rate: rate,
            time_unit: Duration::from_secs(1),
            pre_allocated_vus: max_vus,
            max_vus,
            start_time: Duration::ZERO,
            stages: vec![Stage::new(rate, Duration::from_millis(millis))],
        }
    }

    #[tokio::test]
    async fn runs_iterations_at_roughly_the_target_rate() {
        let mut runner = ScenarioRunner::with_tick(Duration::from_millis(10));
        runner.add(Scenario {
            spec: flat_spec("steady", 100.0, 200, 50),
            entry: Arc::new(|| Box::pin(async { AssertionResult::success("ok".to_string()) })),
        });

        let summaries = runner.run().await;
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.name, "steady");
        // ~20 arrivals expected over 200ms at 100/s; stay loose on timing.
        assert!(summary.iterations >= 10, "got {}", summary.iterations);
        assert!(summary.iterations <= 40, "got {}", summary.iterations);
        assert_eq!(summary.passed, summary.iterations);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn failures_are_counted_and_first_failure_kept() {
        let mut runner = ScenarioRunner::with_tick(Duration::from_millis(10));
        runner.add(Scenario {
            spec: flat_spec("failing", 50.0, 200, 50),
            entry: Arc::new(|| {
                Box::pin(async {
                    AssertionResult::failure("boom".to_string(), Some("detail".to_string()))
                })
            }),
        });

        let summaries = runner.run().await;
        let summary = &summaries[0];
        assert!(summary.failed >= 1);
        assert_eq!(summary.passed, 0);
        let first = summary.first_failure.as_deref().unwrap();
        assert!(first.contains("boom"));
    }

    #[tokio::test]
    async fn arrivals_beyond_the_vu_cap_are_shed_not_queued() {
        let mut runner = ScenarioRunner::with_tick(Duration::from_millis(10));
        runner.add(Scenario {
            spec: flat_spec("saturated", 200.0, 200, 1),
            entry: Arc::new(|| {
                Box::pin(async {
                    sleep(Duration::from_millis(300)).await;
                    AssertionResult::success("slow".to_string())
                })
            }),
        });

        let summaries = runner.run().await;
        let summary = &summaries[0];
        assert!(summary.dropped >= 1, "expected shed arrivals");
        assert!(summary.iterations >= 1);
    }

    #[tokio::test]
    async fn summaries_come_back_in_declaration_order() {
        let mut runner = ScenarioRunner::with_tick(Duration::from_millis(10));
        let entry: IterationFn = Arc::new(|| Box::pin(async { AssertionResult::success("ok".to_string()) }));
        // Second scenario starts first; order must still follow declaration.
        let mut offset = flat_spec("later", 50.0, 50, 10);
        offset.start_time = Duration::from_millis(100);
        runner.add(Scenario {
            spec: offset,
            entry: entry.clone(),
        });
        runner.add(Scenario {
            spec: flat_spec("earlier", 50.0, 50, 10),
            entry,
        });

        let summaries = runner.run().await;
        assert_eq!(summaries[0].name, "later");
        assert_eq!(summaries[1].name, "earlier");
    }
}
