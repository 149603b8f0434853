//! Load suite
//!
//! Bulk volume: a thousand folders of generated rules queried by a single
//! unfiltered ramping scenario. The interesting part is the provisioning
//! path — folder lifecycle plus a Generator run big enough to need the full
//! setup timeout — and the exact `min(total_groups, limit)` group count
//! coming back under load.

use super::{GROUP_LIMIT, query_scenario};
use crate::config::{GrafanaConfig, LoadSuiteConfig};
use crate::http::{GrafanaClient, RuleFilters};
use crate::runtime::{DataProvisioner, ScenarioRunner, ScenarioSpec, ScenarioSummary, Stage};
use crate::testing::{all, assert_group_count, assert_group_limit};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

fn load_spec() -> ScenarioSpec {
    ScenarioSpec {
        name: "load_search".to_string(),
        start_rate: 5.0,
        time_unit: Duration::from_secs(1),
        pre_allocated_vus: 50,
        max_vus: 200,
        start_time: Duration::ZERO,
        stages: vec![
            Stage::new(20.0, Duration::from_secs(30)),
            Stage::new(40.0, Duration::from_secs(30)),
            Stage::new(40.0, Duration::from_secs(60)),
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
    let suite = LoadSuiteConfig::from_env()?;
    let expected_groups = suite.total_groups()?;
    let groups_per_folder = suite.groups_per_folder()?;

    tracing::info!(
        "🧪 Load suite: {} rules across {} folders ({} groups per folder)",
        suite.alert_rule_count + suite.recording_rule_count,
        suite.folder_count,
        groups_per_folder
    );

    let setup = async {
        let specs = DataProvisioner::folder_specs(suite.folder_count);
        let uids = provisioner.provision_folders(&specs).await;
        let generate = suite.generate_config(grafana, uids.clone())?;
        provisioner.generate_rule_data(&generate).await?;
        Ok::<Vec<String>, Box<dyn std::error::Error>>(uids)
    };
    let uids = timeout(setup_timeout, setup)
        .await
        .map_err(|_| format!("setup timed out after {setup_timeout:?}"))??;

    let limit = GROUP_LIMIT as u64;
    let mut runner = ScenarioRunner::new();
    runner.add(query_scenario(
        load_spec(),
        client,
        RuleFilters::default(),
        Arc::new(move |groups| {
            all([
                assert_group_limit(groups, limit),
                assert_group_count(groups, expected_groups, limit),
            ])
        }),
    ));
    let summaries = runner.run().await;

    // Teardown stays best-effort: every folder is attempted and a failed
    // nuke only logs, so an interrupted run can be cleaned up by rerunning.
    tracing::info!("🧹 Tearing down test data in Grafana");
    let teardown = async {
        provisioner.teardown_folders(&uids).await;
        if let Err(e) = provisioner.nuke(grafana.upload_config(Vec::new())).await {
            tracing::warn!("⚠️ Teardown nuke failed: {e}");
        }
    };
    if timeout(teardown_timeout, teardown).await.is_err() {
        tracing::warn!("⏰ Teardown timed out after {teardown_timeout:?}");
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_ramp_peaks_at_forty_per_second() {
        let spec = load_spec();
        let schedule = spec.schedule();
        assert_eq!(spec.total_duration(), Duration::from_secs(150));
        assert_eq!(schedule.rate_at(Duration::from_secs(60)), Some(40.0));
        assert_eq!(schedule.rate_at(Duration::from_secs(150)), Some(0.0));
    }
}
