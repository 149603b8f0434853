//! Response-shape assertions
//!
//! Checks run inside scenario iterations against the groups a query
//! returned. An assertion failure is a test outcome, recorded per iteration
//! by the runner; it is never a harness error and never halts concurrent
//! iterations.

use shared::RuleGroup;

#[derive(Debug, Clone)]
pub struct AssertionResult {
    pub success: bool,
    pub message: String,
    pub details: Option<String>,
}

impl AssertionResult {
    pub fn success(message: String) -> Self {
        Self {
            success: true,
            message,
            details: None,
        }
    }

    pub fn failure(message: String, details: Option<String>) -> Self {
        Self {
            success: false,
            message,
            details,
        }
    }

    /// One-line rendering for logs and summaries.
    pub fn describe(&self) -> String {
        match &self.details {
            Some(details) => format!("{} ({details})", self.message),
            None => self.message.clone(),
        }
    }
}

/// Groups a query can return given `expected` provisioned groups and the
/// per-request `limit`.
pub fn expected_group_count(expected: u64, limit: u64) -> u64 {
    expected.min(limit)
}

/// The backend must enforce the group limit on every response.
pub fn assert_group_limit(groups: &[RuleGroup], limit: u64) -> AssertionResult {
    let observed = groups.len() as u64;
    if observed <= limit {
        AssertionResult::success(format!("group limit {limit} enforced ({observed} groups)"))
    } else {
        AssertionResult::failure(
            format!("group limit {limit} not enforced"),
            Some(format!("observed {observed} groups")),
        )
    }
}

/// An unfiltered query over provisioned data must return exactly
/// `min(expected, limit)` groups.
pub fn assert_group_count(groups: &[RuleGroup], expected: u64, limit: u64) -> AssertionResult {
    let want = expected_group_count(expected, limit);
    let observed = groups.len() as u64;
    if observed == want {
        AssertionResult::success(format!("observed the expected {want} groups"))
    } else {
        AssertionResult::failure(
            format!("expected {want} groups, observed {observed}"),
            Some(format!("{expected} provisioned, limit {limit}")),
        )
    }
}

/// With data provisioned and no filter trimming results, an empty response
/// means the provisioning silently failed.
pub fn assert_some_groups(groups: &[RuleGroup]) -> AssertionResult {
    if groups.is_empty() {
        AssertionResult::failure(
            "no groups returned over provisioned data".to_string(),
            None,
        )
    } else {
        AssertionResult::success(format!("{} groups returned", groups.len()))
    }
}

/// Every rule in every returned group must report the queried datasource
/// among its `queriedDatasourceUIDs`.
pub fn assert_datasource_membership(groups: &[RuleGroup], datasource: &str) -> AssertionResult {
    for group in groups {
        for rule in &group.rules {
            if !rule.queried_datasource_uids.iter().any(|uid| uid == datasource) {
                return AssertionResult::failure(
                    format!("rule does not query datasource '{datasource}'"),
                    Some(format!(
                        "group '{}', rule '{}', queried: {:?}",
                        group.title, rule.title, rule.queried_datasource_uids
                    )),
                );
            }
        }
    }
    AssertionResult::success(format!(
        "all rules in {} groups query '{datasource}'",
        groups.len()
    ))
}

/// Combine several checks; the first failure wins.
pub fn all(results: impl IntoIterator<Item = AssertionResult>) -> AssertionResult {
    let mut passed = 0;
    for result in results {
        if !result.success {
            return result;
        }
        passed += 1;
    }
    AssertionResult::success(format!("{passed} assertions passed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Rule;

    fn group(title: &str, datasources: &[&[&str]]) -> RuleGroup {
        RuleGroup {
            title: title.to_string(),
            rules: datasources
                .iter()
                .enumerate()
                .map(|(i, uids)| Rule {
                    title: format!("{title}-rule-{i}"),
                    queried_datasource_uids: uids.iter().map(|s| s.to_string()).collect(),
                    ..Rule::default()
                })
                .collect(),
        }
    }

    #[test]
    fn expected_count_is_min_of_provisioned_and_limit() {
        assert_eq!(expected_group_count(20, 40), 20);
        assert_eq!(expected_group_count(2000, 40), 40);
        assert_eq!(expected_group_count(0, 40), 0);
    }

    #[test]
    fn group_limit_check() {
        let groups = vec![group("g", &[&["ds"]]); 3];
        assert!(assert_group_limit(&groups, 40).success);
        assert!(assert_group_limit(&groups, 3).success);
        assert!(!assert_group_limit(&groups, 2).success);
    }

    #[test]
    fn group_count_check_matches_min_semantics() {
        let groups = vec![group("g", &[&["ds"]]); 20];
        assert!(assert_group_count(&groups, 20, 40).success);
        assert!(!assert_group_count(&groups, 21, 40).success);

        let capped = vec![group("g", &[&["ds"]]); 40];
        assert!(assert_group_count(&capped, 2000, 40).success);
    }

    #[test]
    fn membership_accepts_rules_listing_the_datasource() {
        let groups = vec![
            group("a", &[&["grafanacloud-prom"], &["grafanacloud-prom", "loki"]]),
            group("b", &[&["other", "grafanacloud-prom"]]),
        ];
        assert!(assert_datasource_membership(&groups, "grafanacloud-prom").success);
    }

    #[test]
    fn membership_rejects_a_single_violating_rule() {
        let groups = vec![
            group("a", &[&["grafanacloud-prom"]]),
            group("b", &[&["grafanacloud-prom"], &["loki"]]),
        ];
        let result = assert_datasource_membership(&groups, "grafanacloud-prom");
        assert!(!result.success);
        let details = result.details.unwrap();
        assert!(details.contains("group 'b'"));
        assert!(details.contains("b-rule-1"));
    }

    #[test]
    fn some_groups_check() {
        assert!(!assert_some_groups(&[]).success);
        assert!(assert_some_groups(&[group("g", &[])]).success);
    }

    #[test]
    fn all_returns_first_failure() {
        let combined = all([
            AssertionResult::success("a".to_string()),
            AssertionResult::failure("bad".to_string(), None),
            AssertionResult::failure("worse".to_string(), None),
        ]);
        assert!(!combined.success);
        assert_eq!(combined.message, "bad");

        let ok = all([AssertionResult::success("a".to_string())]);
        assert!(ok.success);
    }
}
