//! Suite parameter resolution
//!
//! The search and load suites provision different data volumes; both resolve
//! their counts from the environment once and validate that the requested
//! shape divides into whole groups and folders before anything is created.

use super::grafana::{GrafanaConfig, env_or_default};
use shared::{GenerateConfig, HarnessError, HarnessResult};

/// Datasource the generated rules query, and the one the search scenarios
/// filter on.
pub const QUERY_DATASOURCE: &str = "grafanacloud-prom";
/// Datasource the generated recording rules write to.
pub const WRITE_DATASOURCE: &str = "grafanacloud-prom";

/// Generator upload parallelism for bulk provisioning.
const GENERATOR_CONCURRENCY: u32 = 100;

fn env_u64(name: &str, default: u64) -> HarnessResult<u64> {
    let raw = env_or_default(name, &default.to_string());
    raw.parse().map_err(|_| HarnessError::InvalidConfig {
        field: name.to_string(),
        value: raw,
        reason: "expected an unsigned integer".to_string(),
    })
}

/// Integer division that refuses to truncate. A fractional result means the
/// requested counts don't fit the requested shape.
fn exact_div(numerator: u64, denominator: u64, field: &str) -> HarnessResult<u64> {
    if denominator == 0 {
        return Err(HarnessError::InvalidConfig {
            field: field.to_string(),
            value: "0".to_string(),
            reason: "must be non-zero".to_string(),
        });
    }
    if numerator % denominator != 0 {
        return Err(HarnessError::InvalidConfig {
            field: field.to_string(),
            value: denominator.to_string(),
            reason: format!("{numerator} does not divide evenly by {denominator}"),
        });
    }
    Ok(numerator / denominator)
}

/// Parameters for the search suite: a modest fixed volume of rules queried
/// by four filtered/unfiltered scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSuiteConfig {
    pub alert_rule_count: u64,
    pub recording_rule_count: u64,
    pub rules_per_group: u64,
    pub groups_per_folder: u64,
}

impl SearchSuiteConfig {
    pub fn from_env() -> HarnessResult<Self> {
        let config = Self {
            alert_rule_count: env_u64("ALERT_RULE_COUNT", 100)?,
            recording_rule_count: env_u64("RECORDING_RULE_COUNT", 100)?,
            rules_per_group: env_u64("RULES_PER_GROUP", 10)?,
            groups_per_folder: env_u64("GROUPS_PER_FOLDER", 5)?,
        };
        // Surface a bad shape at startup, not after provisioning started.
        config.total_groups()?;
        Ok(config)
    }

    /// Number of groups the Generator will produce for these counts.
    pub fn total_groups(&self) -> HarnessResult<u64> {
        exact_div(
            self.alert_rule_count + self.recording_rule_count,
            self.rules_per_group,
            "RULES_PER_GROUP",
        )
    }

    /// Full Generator input, including the nuke of any previous run's data.
    pub fn generate_config(&self, grafana: &GrafanaConfig) -> GenerateConfig {
        GenerateConfig {
            alert_rule_count: self.alert_rule_count,
            recording_rule_count: self.recording_rule_count,
            query_datasource: QUERY_DATASOURCE.to_string(),
            write_datasource: WRITE_DATASOURCE.to_string(),
            rules_per_group: self.rules_per_group,
            groups_per_folder: self.groups_per_folder,
            upload_config: Some(grafana.upload_config(Vec::new())),
            nuke: true,
            concurrency: Some(GENERATOR_CONCURRENCY),
            ..GenerateConfig::default()
        }
    }
}

/// Parameters for the load suite: bulk volume spread over a fixed folder
/// count, with groups-per-folder derived rather than configured.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSuiteConfig {
    pub alert_rule_count: u64,
    pub recording_rule_count: u64,
    pub rules_per_group: u64,
    pub folder_count: u64,
}

impl LoadSuiteConfig {
    pub fn from_env() -> HarnessResult<Self> {
        let config = Self {
            alert_rule_count: env_u64("ALERT_RULE_COUNT", 100_000)?,
            recording_rule_count: env_u64("RECORDING_RULE_COUNT", 100_000)?,
            rules_per_group: env_u64("RULES_PER_GROUP", 100)?,
            folder_count: env_u64("FOLDER_COUNT", 1000)?,
        };
        config.groups_per_folder()?;
        Ok(config)
    }

    pub fn total_groups(&self) -> HarnessResult<u64> {
        exact_div(
            self.alert_rule_count + self.recording_rule_count,
            self.rules_per_group,
            "RULES_PER_GROUP",
        )
    }

    /// Groups landing in each provisioned folder. Must come out whole; a
    /// fractional result is a misconfiguration and fails the run up front.
    pub fn groups_per_folder(&self) -> HarnessResult<u64> {
        exact_div(self.total_groups()?, self.folder_count, "FOLDER_COUNT")
    }

    /// Full Generator input targeting the already-provisioned folders.
    pub fn generate_config(
        &self,
        grafana: &GrafanaConfig,
        folder_uids: Vec<String>,
    ) -> HarnessResult<GenerateConfig> {
        Ok(GenerateConfig {
            alert_rule_count: self.alert_rule_count,
            recording_rule_count: self.recording_rule_count,
            query_datasource: QUERY_DATASOURCE.to_string(),
            write_datasource: WRITE_DATASOURCE.to_string(),
            rules_per_group: self.rules_per_group,
            groups_per_folder: self.groups_per_folder()?,
            upload_config: Some(grafana.upload_config(folder_uids)),
            nuke: true,
            concurrency: Some(GENERATOR_CONCURRENCY),
            ..GenerateConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn grafana() -> GrafanaConfig {
        GrafanaConfig {
            url: "http://localhost:3000".to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
            token: String::new(),
        }
    }

    #[test]
    fn search_defaults_yield_twenty_groups() {
        let config = SearchSuiteConfig {
            alert_rule_count: 100,
            recording_rule_count: 100,
            rules_per_group: 10,
            groups_per_folder: 5,
        };
        assert_eq!(config.total_groups().unwrap(), 20);
    }

    #[test]
    fn load_defaults_yield_two_groups_per_folder() {
        let config = LoadSuiteConfig {
            alert_rule_count: 100_000,
            recording_rule_count: 100_000,
            rules_per_group: 100,
            folder_count: 1000,
        };
        assert_eq!(config.total_groups().unwrap(), 2000);
        assert_eq!(config.groups_per_folder().unwrap(), 2);
    }

    #[test]
    fn fractional_group_split_fails_loudly() {
        let config = LoadSuiteConfig {
            alert_rule_count: 100_000,
            recording_rule_count: 100_000,
            rules_per_group: 100,
            folder_count: 3000,
        };
        assert_matches!(
            config.groups_per_folder(),
            Err(HarnessError::InvalidConfig { ref field, .. }) if field == "FOLDER_COUNT"
        );
    }

    #[test]
    fn fractional_rule_split_fails_loudly() {
        let config = SearchSuiteConfig {
            alert_rule_count: 101,
            recording_rule_count: 100,
            rules_per_group: 10,
            groups_per_folder: 5,
        };
        assert_matches!(
            config.total_groups(),
            Err(HarnessError::InvalidConfig { ref field, .. }) if field == "RULES_PER_GROUP"
        );
    }

    #[test]
    fn zero_divisor_is_rejected() {
        assert_matches!(exact_div(10, 0, "RULES_PER_GROUP"), Err(HarnessError::InvalidConfig { .. }));
    }

    #[test]
    fn non_numeric_env_value_is_a_config_error() {
        unsafe { std::env::set_var("HARNESS_TEST_BAD_COUNT", "plenty") };
        assert_matches!(
            env_u64("HARNESS_TEST_BAD_COUNT", 7),
            Err(HarnessError::InvalidConfig { ref field, ref value, .. })
                if field == "HARNESS_TEST_BAD_COUNT" && value == "plenty"
        );
        assert_eq!(env_u64("HARNESS_TEST_MISSING_COUNT", 7).unwrap(), 7);
    }

    #[test]
    fn search_generate_config_carries_nuke_and_upload_target() {
        let config = SearchSuiteConfig {
            alert_rule_count: 100,
            recording_rule_count: 100,
            rules_per_group: 10,
            groups_per_folder: 5,
        };
        let generate = config.generate_config(&grafana());
        assert!(generate.nuke);
        assert_eq!(generate.query_datasource, QUERY_DATASOURCE);
        assert_eq!(generate.concurrency, Some(100));
        let upload = generate.upload_config.unwrap();
        assert_eq!(upload.grafana_url, "http://localhost:3000");
        assert!(upload.folder_uids.is_empty());
    }
}
