//! Test Suites
//!
//! Named suites in the style of a scenario registry: each resolves its own
//! data volume, provisions through the Generator, runs its ramping
//! scenarios, and tears its data down afterwards.

pub mod load;
pub mod search;

use crate::config::GrafanaConfig;
use crate::http::{GrafanaClient, RuleFilters, build_request_params};
use crate::runtime::{
    CommandGenerator, DataProvisioner, IterationFn, Scenario, ScenarioSpec, ScenarioSummary,
};
use crate::testing::AssertionResult;
use shared::RuleGroup;
use std::sync::Arc;
use std::time::Duration;

/// Group limit requested by every suite query.
pub const GROUP_LIMIT: u32 = 40;

pub struct TestSuites;

impl TestSuites {
    /// Run a suite by name.
    pub async fn run_suite(
        name: &str,
        setup_timeout: Duration,
        teardown_timeout: Duration,
    ) -> Result<Vec<ScenarioSummary>, Box<dyn std::error::Error>> {
        let grafana = GrafanaConfig::from_env();
        let params = build_request_params(&grafana.username, &grafana.password, &grafana.token);
        let client = GrafanaClient::new(&grafana.url, params)?;
        let provisioner =
            DataProvisioner::new(client.clone(), Box::new(CommandGenerator::from_env()));

        match name {
            "search" => {
                search::run(&grafana, client, &provisioner, setup_timeout, teardown_timeout).await
            }
            "load" => {
                load::run(&grafana, client, &provisioner, setup_timeout, teardown_timeout).await
            }
            _ => Err(format!(
                "Unknown test suite: '{}'. Available: {}",
                name,
                Self::available_suites().join(", ")
            )
            .into()),
        }
    }

    /// Get list of available suites
    pub fn available_suites() -> Vec<&'static str> {
        vec!["search", "load"]
    }
}

/// Bind a query-and-check iteration to a scenario spec.
///
/// Every iteration issues one rules query with the given filters and hands
/// the returned groups to `check`; a transport failure is itself a failed
/// iteration.
pub(crate) fn query_scenario(
    spec: ScenarioSpec,
    client: GrafanaClient,
    filters: RuleFilters,
    check: Arc<dyn Fn(&[RuleGroup]) -> AssertionResult + Send + Sync>,
) -> Scenario {
    let entry: IterationFn = Arc::new(move || {
        let client = client.clone();
        let filters = filters.clone();
        let check = check.clone();
        Box::pin(async move {
            match client.query_rules(&filters, GROUP_LIMIT).await {
                Ok(groups) => check(&groups),
                Err(e) => {
                    AssertionResult::failure("rules query failed".to_string(), Some(e.to_string()))
                }
            }
        })
    });
    Scenario { spec, entry }
}
