//! Search suite
//!
//! Four ramping scenarios against the rules search endpoint, windowed
//! back-to-back: unfiltered, datasource-filtered, datasource + name search,
//! and group + state. Each window ramps 30s up, 30s up again, holds 60s,
//! then ramps down over 30s (2m30s total), so the four offsets land at 0,
//! 2m30s, 5m and 7m30s.

use super::{GROUP_LIMIT, query_scenario};
use crate::config::{GrafanaConfig, QUERY_DATASOURCE, SearchSuiteConfig};
use crate::http::{GrafanaClient, RuleFilters};
use crate::runtime::{DataProvisioner, ScenarioRunner, ScenarioSpec, ScenarioSummary, Stage};
use crate::testing::{
    all, assert_datasource_membership, assert_group_count, assert_group_limit, assert_some_groups,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Length of one scenario window: 30s + 30s + 60s + 30s.
const WINDOW: Duration = Duration::from_secs(150);

fn ramp_spec(name: &str, window_index: u32) -> ScenarioSpec {
    ScenarioSpec {
        name: name.to_string(),
        start_rate: 5.0,
        time_unit: Duration::from_secs(1),
        pre_allocated_vus: 20,
        max_vus: 100,
        start_time: WINDOW * window_index,
        stages: vec![
            Stage::new(10.0, Duration::from_secs(30)),
            Stage::new(20.0, Duration::from_secs(30)),
            Stage::new(20.0, Duration::from_secs(60)),
            Stage::new(0.0, Duration::from_secs(30)),
        ],
    }
}

pub async fn run(
    grafana: &GrafanaConfig,
    client: GrafanaClient,
    provisioner: &DataProvisioner,
    setup_timeout: Duration,
    teardown_timeout: Duration,
) -> Result<Vec<ScenarioSummary>, Box<dyn std::error::Error>> {
    let suite = SearchSuiteConfig::from_env()?;
    let expected_groups = suite.total_groups()?;

    tracing::info!(
        "🧪 Search suite: {} alerting + {} recording rules, {} groups expected",
        suite.alert_rule_count,
        suite.recording_rule_count,
        expected_groups
    );

    tracing::info!("📦 Creating test data in Grafana");
    timeout(
        setup_timeout,
        provisioner.generate_rule_data(&suite.generate_config(grafana)),
    )
    .await
    .map_err(|_| format!("setup timed out after {setup_timeout:?}"))??;

    let runner = build_runner(client, expected_groups);
    let summaries = runner.run().await;

    tracing::info!("🧹 Tearing down test data in Grafana");
    match timeout(
        teardown_timeout,
        provisioner.nuke(grafana.upload_config(Vec::new())),
    )
    .await
    {
        Err(_) => tracing::warn!("⏰ Teardown timed out after {teardown_timeout:?}"),
        Ok(Err(e)) => tracing::warn!("⚠️ Teardown nuke failed: {e}"),
        Ok(Ok(())) => tracing::info!("✅ Test data removed"),
    }

    Ok(summaries)
}

fn build_runner(client: GrafanaClient, expected_groups: u64) -> ScenarioRunner {
    let mut runner = ScenarioRunner::new();
    let limit = GROUP_LIMIT as u64;

    // 1. Unfiltered: the limit must hold and the provisioned groups must
    //    actually show up.
    runner.add(query_scenario(
        ramp_spec("no_filters", 0),
        client.clone(),
        RuleFilters::default(),
        Arc::new(move |groups| {
            all([
                assert_group_limit(groups, limit),
                assert_group_count(groups, expected_groups, limit),
                assert_some_groups(groups),
            ])
        }),
    ));

    // 2. Datasource filter: every returned rule must query it.
    let mut datasource_only = RuleFilters::default();
    datasource_only.datasource_uid = Some(QUERY_DATASOURCE.to_string());
    runner.add(query_scenario(
        ramp_spec("datasource_filter", 1),
        client.clone(),
        datasource_only,
        Arc::new(|groups| {
            all([
                assert_group_limit(groups, GROUP_LIMIT as u64),
                assert_datasource_membership(groups, QUERY_DATASOURCE),
            ])
        }),
    ));

    // 3. Datasource + name search: any rule with an "A" in its name.
    let mut name_search = RuleFilters::default();
    name_search.datasource_uid = Some(QUERY_DATASOURCE.to_string());
    name_search.rule_name = Some("A".to_string());
    runner.add(query_scenario(
        ramp_spec("rule_name_search", 2),
        client.clone(),
        name_search,
        Arc::new(|groups| {
            all([
                assert_group_limit(groups, GROUP_LIMIT as u64),
                assert_datasource_membership(groups, QUERY_DATASOURCE),
            ])
        }),
    ));

    // 4. Group + state: exercises the remaining whitelist keys; only the
    //    limit is checkable without knowing generated group names.
    let mut group_and_state = RuleFilters::default();
    group_and_state.rule_group = Some("group".to_string());
    group_and_state.state = Some("firing".to_string());
    runner.add(query_scenario(
        ramp_spec("group_and_state", 3),
        client,
        group_and_state,
        Arc::new(|groups| assert_group_limit(groups, GROUP_LIMIT as u64)),
    ));

    runner
}
