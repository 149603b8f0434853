//! Alerting search load harness
//!
//! Drives staged load against a Grafana alerting-rule search API and checks
//! that filtering and response shape hold up under it.
//!
//! ## Main Interface
//!
//! A run resolves its configuration once, provisions a known quantity of
//! rule data through the external Generator, then executes one or more named
//! scenarios — each an arrival-rate ramp bound to an iteration function that
//! queries the rules endpoint and asserts on the returned groups.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use harness::*;
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let grafana = GrafanaConfig::from_env();
//! let params = build_request_params(&grafana.username, &grafana.password, &grafana.token);
//! let client = GrafanaClient::new(&grafana.url, params)?;
//!
//! let mut filters = RuleFilters::default();
//! filters.datasource_uid = Some("grafanacloud-prom".to_string());
//! let groups = client.query_rules(&filters, 40).await?;
//! let outcome = assert_datasource_membership(&groups, "grafanacloud-prom");
//! assert!(outcome.success);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod config;
pub mod http;
pub mod runtime;
pub mod scenarios;
pub mod testing;

// Main interfaces - re-exported at crate root for convenience
pub use config::{GrafanaConfig, LoadSuiteConfig, SearchSuiteConfig, env_or_default};
pub use http::{GrafanaClient, RuleFilters, build_request_params, build_rules_url};
pub use runtime::{CommandGenerator, DataProvisioner, RampSchedule, RuleGenerator, Scenario, ScenarioRunner, Stage};
pub use scenarios::TestSuites;
pub use testing::{AssertionResult, assert_datasource_membership, expected_group_count};

// Supporting types
pub use http::{FILTERED_GROUP_LIMIT, FilterKey, RULES_PATH};
pub use runtime::{FOLDER_UID_BASE, ScenarioSpec, ScenarioSummary};
