//! Runtime building blocks
//!
//! The Generator seam, folder provisioning/teardown, and the arrival-rate
//! machinery that drives scenario iterations.

mod generator;
mod provisioner;
mod runner;
mod schedule;

pub use generator::{CommandGenerator, RuleGenerator};
pub use provisioner::{DataProvisioner, FOLDER_UID_BASE};
pub use runner::{IterationFn, Scenario, ScenarioRunner, ScenarioSpec, ScenarioSummary};
pub use schedule::{RampSchedule, Stage};
