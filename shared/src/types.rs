//! Wire types exchanged with the Grafana backend and the rule Generator

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Authentication mode carried by [`RequestParams`].
///
/// Bearer strictly supersedes Basic: a non-empty API token replaces the
/// Basic header entirely, the two never coexist on one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMode {
    Basic,
    Bearer,
}

/// Request parameter bundle applied to every HTTP call in a run.
///
/// Built once from the resolved credentials, then shared read-only across
/// all concurrent scenario iterations.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestParams {
    pub headers: HashMap<String, String>,
    pub auth_mode: AuthMode,
}

/// A Grafana folder holding generated rule groups. Identity is `uid`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub uid: String,
    pub title: String,
    pub description: String,
}

/// A single rule as returned by the Prometheus-compatible rules endpoint.
///
/// Unknown response fields are tolerated so backend additions don't break
/// the harness.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "queriedDatasourceUIDs", default)]
    pub queried_datasource_uids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
}

/// A named collection of rules evaluated together.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleGroup {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Payload of the rules endpoint: `{"data": {"groups": [...]}}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RulesData {
    #[serde(default)]
    pub groups: Vec<RuleGroup>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RulesResponse {
    #[serde(default)]
    pub data: RulesData,
}

/// Upload target passed to the Generator when it should push the generated
/// groups into a Grafana instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    #[serde(rename = "grafanaURL")]
    pub grafana_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
    #[serde(rename = "folderUIDs", default)]
    pub folder_uids: Vec<String>,
}

/// Declarative input to the external rule Generator.
///
/// `numAlerting`/`numRecording` are accepted as aliases of the count fields
/// for compatibility with older generator builds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateConfig {
    #[serde(alias = "numAlerting", default)]
    pub alert_rule_count: u64,
    #[serde(alias = "numRecording", default)]
    pub recording_rule_count: u64,
    #[serde(default)]
    pub query_datasource: String,
    #[serde(default)]
    pub write_datasource: String,
    #[serde(default)]
    pub rules_per_group: u64,
    #[serde(default)]
    pub groups_per_folder: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_config: Option<UploadConfig>,
    /// Delete all previously auto-generated data before (or instead of)
    /// generating anything new.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nuke: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<u32>,
}

impl GenerateConfig {
    /// A config that only deletes previously generated data.
    pub fn nuke_only(upload: UploadConfig) -> Self {
        Self {
            nuke: true,
            upload_config: Some(upload),
            ..Self::default()
        }
    }
}

/// Result of one Generator invocation: the generated groups plus the input
/// config echoed back.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenerateOutput {
    #[serde(default)]
    pub groups: Vec<RuleGroup>,
    #[serde(default)]
    pub input_config: GenerateConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_parses_queried_datasource_uids() {
        let raw = r#"{
            "title": "cpu alert",
            "queriedDatasourceUIDs": ["grafanacloud-prom", "loki"],
            "state": "firing",
            "unknownField": 7
        }"#;
        let rule: Rule = serde_json::from_str(raw).unwrap();
        assert_eq!(rule.title, "cpu alert");
        assert_eq!(rule.queried_datasource_uids, vec!["grafanacloud-prom", "loki"]);
        assert_eq!(rule.state.as_deref(), Some("firing"));
        assert_eq!(rule.health, None);
    }

    #[test]
    fn rules_response_envelope() {
        let raw = r#"{"status":"success","data":{"groups":[{"title":"g1","rules":[]}]}}"#;
        let response: RulesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.data.groups.len(), 1);
        assert_eq!(response.data.groups[0].title, "g1");
    }

    #[test]
    fn generate_config_accepts_count_aliases() {
        let raw = r#"{"numAlerting": 3, "numRecording": 5, "rulesPerGroup": 2}"#;
        let config: GenerateConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.alert_rule_count, 3);
        assert_eq!(config.recording_rule_count, 5);
        assert_eq!(config.rules_per_group, 2);
    }

    #[test]
    fn generate_config_wire_names_are_camel_case() {
        let config = GenerateConfig {
            alert_rule_count: 1,
            upload_config: Some(UploadConfig {
                grafana_url: "http://localhost:3000".to_string(),
                folder_uids: vec!["f-0".to_string()],
                ..UploadConfig::default()
            }),
            nuke: true,
            ..GenerateConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["alertRuleCount"], 1);
        assert_eq!(value["nuke"], true);
        assert_eq!(value["uploadConfig"]["grafanaURL"], "http://localhost:3000");
        assert_eq!(value["uploadConfig"]["folderUIDs"][0], "f-0");
        // Unset optionals stay off the wire entirely.
        assert!(value.get("seed").is_none());
        assert!(value["uploadConfig"].get("token").is_none());
    }

    #[test]
    fn nuke_only_config_omits_generation_counts_semantics() {
        let config = GenerateConfig::nuke_only(UploadConfig {
            grafana_url: "http://localhost:3000".to_string(),
            username: Some("admin".to_string()),
            password: Some("admin".to_string()),
            ..UploadConfig::default()
        });
        assert!(config.nuke);
        assert_eq!(config.alert_rule_count, 0);
        assert_eq!(config.recording_rule_count, 0);
    }
}
