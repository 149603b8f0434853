//! Rules-URL construction
//!
//! The backend accepts a fixed set of search filters. That set is closed
//! here as an enum plus a struct of optional fields, so a filter outside the
//! whitelist cannot be expressed in typed code at all; the runtime check
//! survives only at the boundary from untyped input ([`RuleFilters::from_pairs`]).

use shared::{HarnessError, HarnessResult};
use url::form_urlencoded;

/// Path of the Prometheus-compatible rules endpoint.
pub const RULES_PATH: &str = "/api/prometheus/grafana/api/v1/rules";

/// Group limit applied to every filtered query. The caller-supplied limit
/// feeds only the unfiltered branch of [`build_rules_url`].
pub const FILTERED_GROUP_LIMIT: u32 = 40;

/// The whitelisted search filters of the rules endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKey {
    DatasourceUid,
    RuleName,
    RuleGroup,
    Namespace,
    Plugins,
    ReceiverName,
    RuleMatcher,
    RuleType,
    State,
    Health,
}

impl FilterKey {
    /// Every key, in the order pairs are appended to the query string.
    pub const ALL: [FilterKey; 10] = [
        FilterKey::DatasourceUid,
        FilterKey::RuleName,
        FilterKey::RuleGroup,
        FilterKey::Namespace,
        FilterKey::Plugins,
        FilterKey::ReceiverName,
        FilterKey::RuleMatcher,
        FilterKey::RuleType,
        FilterKey::State,
        FilterKey::Health,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKey::DatasourceUid => "datasource_uid",
            FilterKey::RuleName => "search.rule_name",
            FilterKey::RuleGroup => "search.rule_group",
            FilterKey::Namespace => "namespace",
            FilterKey::Plugins => "plugins",
            FilterKey::ReceiverName => "receiver_name",
            FilterKey::RuleMatcher => "rule_matcher",
            FilterKey::RuleType => "rule_type",
            FilterKey::State => "state",
            FilterKey::Health => "health",
        }
    }

    pub fn parse(name: &str) -> Option<FilterKey> {
        FilterKey::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

/// One optional value per whitelisted filter.
///
/// Values are URL-encoded when the query string is built; structured values
/// (e.g. a JSON-encoded matcher) are expected to already be valid content —
/// the builder does not validate filter semantics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleFilters {
    pub datasource_uid: Option<String>,
    pub rule_name: Option<String>,
    pub rule_group: Option<String>,
    pub namespace: Option<String>,
    pub plugins: Option<String>,
    pub receiver_name: Option<String>,
    pub rule_matcher: Option<String>,
    pub rule_type: Option<String>,
    pub state: Option<String>,
    pub health: Option<String>,
}

impl RuleFilters {
    /// Build a filter set from untyped name/value pairs.
    ///
    /// Fails on any name outside the whitelist and on repeated names, before
    /// any network call is made. Never drops a pair silently.
    pub fn from_pairs<I, K, V>(pairs: I) -> HarnessResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filters = Self::default();
        for (name, value) in pairs {
            let name = name.as_ref();
            let key = FilterKey::parse(name).ok_or_else(|| HarnessError::UnknownFilter {
                name: name.to_string(),
            })?;
            let slot = filters.slot_mut(key);
            if slot.is_some() {
                return Err(HarnessError::DuplicateFilter {
                    name: name.to_string(),
                });
            }
            *slot = Some(value.into());
        }
        Ok(filters)
    }

    pub fn is_empty(&self) -> bool {
        FilterKey::ALL.into_iter().all(|key| self.get(key).is_none())
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::DatasourceUid => self.datasource_uid.as_deref(),
            FilterKey::RuleName => self.rule_name.as_deref(),
            FilterKey::RuleGroup => self.rule_group.as_deref(),
            FilterKey::Namespace => self.namespace.as_deref(),
            FilterKey::Plugins => self.plugins.as_deref(),
            FilterKey::ReceiverName => self.receiver_name.as_deref(),
            FilterKey::RuleMatcher => self.rule_matcher.as_deref(),
            FilterKey::RuleType => self.rule_type.as_deref(),
            FilterKey::State => self.state.as_deref(),
            FilterKey::Health => self.health.as_deref(),
        }
    }

    /// Set filters in whitelist order.
    pub fn pairs(&self) -> Vec<(FilterKey, &str)> {
        FilterKey::ALL
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key, value)))
            .collect()
    }

    fn slot_mut(&mut self, key: FilterKey) -> &mut Option<String> {
        match key {
            FilterKey::DatasourceUid => &mut self.datasource_uid,
            FilterKey::RuleName => &mut self.rule_name,
            FilterKey::RuleGroup => &mut self.rule_group,
            FilterKey::Namespace => &mut self.namespace,
            FilterKey::Plugins => &mut self.plugins,
            FilterKey::ReceiverName => &mut self.receiver_name,
            FilterKey::RuleMatcher => &mut self.rule_matcher,
            FilterKey::RuleType => &mut self.rule_type,
            FilterKey::State => &mut self.state,
            FilterKey::Health => &mut self.health,
        }
    }
}

/// Build the rules-endpoint URL for the given filter set.
///
/// Without filters the caller's `group_limit` is used verbatim. With
/// filters, `group_limit` is pinned at [`FILTERED_GROUP_LIMIT`] and one
/// URL-encoded `key=value` pair is appended per set filter, joined by `&`.
pub fn build_rules_url(base_url: &str, filters: &RuleFilters, group_limit: u32) -> String {
    let base = base_url.trim_end_matches('/');

    if filters.is_empty() {
        return format!("{base}{RULES_PATH}?group_limit={group_limit}");
    }

    let mut url = format!("{base}{RULES_PATH}?group_limit={FILTERED_GROUP_LIMIT}");
    for (key, value) in filters.pairs() {
        url.push('&');
        url.push_str(key.as_str());
        url.push('=');
        url.extend(form_urlencoded::byte_serialize(value.as_bytes()));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const BASE: &str = "http://localhost:3000";

    #[test]
    fn empty_filters_use_caller_limit_exactly() {
        let url = build_rules_url(BASE, &RuleFilters::default(), 25);
        assert_eq!(
            url,
            "http://localhost:3000/api/prometheus/grafana/api/v1/rules?group_limit=25"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let url = build_rules_url("http://localhost:3000/", &RuleFilters::default(), 40);
        assert_eq!(
            url,
            "http://localhost:3000/api/prometheus/grafana/api/v1/rules?group_limit=40"
        );
    }

    #[test]
    fn filtered_branch_pins_the_limit_at_forty() {
        let mut filters = RuleFilters::default();
        filters.datasource_uid = Some("grafanacloud-prom".to_string());
        // Caller asks for 100; the filtered branch ignores it.
        let url = build_rules_url(BASE, &filters, 100);
        assert_eq!(
            url,
            "http://localhost:3000/api/prometheus/grafana/api/v1/rules?group_limit=40&datasource_uid=grafanacloud-prom"
        );
    }

    #[test]
    fn pairs_append_in_whitelist_order_without_dups_or_drops() {
        let filters = RuleFilters::from_pairs([
            ("state", "firing"),
            ("datasource_uid", "grafanacloud-prom"),
            ("search.rule_name", "A"),
        ])
        .unwrap();

        let url = build_rules_url(BASE, &filters, 40);
        assert_eq!(
            url,
            "http://localhost:3000/api/prometheus/grafana/api/v1/rules\
             ?group_limit=40&datasource_uid=grafanacloud-prom&search.rule_name=A&state=firing"
        );

        for (key, _) in filters.pairs() {
            assert_eq!(url.matches(&format!("{}=", key.as_str())).count(), 1);
        }
    }

    #[test]
    fn values_are_url_encoded() {
        let mut filters = RuleFilters::default();
        filters.rule_name = Some("cpu usage high".to_string());
        filters.rule_matcher = Some(r#"{"name":"severity","value":"critical"}"#.to_string());

        let url = build_rules_url(BASE, &filters, 40);
        assert!(url.contains("search.rule_name=cpu+usage+high"));
        assert!(url.contains(
            "rule_matcher=%7B%22name%22%3A%22severity%22%2C%22value%22%3A%22critical%22%7D"
        ));
    }

    #[test]
    fn unknown_filter_name_fails_construction() {
        let result = RuleFilters::from_pairs([("search.rule_title", "A")]);
        assert_matches!(
            result,
            Err(HarnessError::UnknownFilter { ref name }) if name == "search.rule_title"
        );
    }

    #[test]
    fn duplicate_filter_name_fails_construction() {
        let result = RuleFilters::from_pairs([("state", "firing"), ("state", "pending")]);
        assert_matches!(
            result,
            Err(HarnessError::DuplicateFilter { ref name }) if name == "state"
        );
    }

    #[test]
    fn every_whitelisted_name_round_trips() {
        for key in FilterKey::ALL {
            assert_eq!(FilterKey::parse(key.as_str()), Some(key));
            let filters = RuleFilters::from_pairs([(key.as_str(), "v")]).unwrap();
            assert_eq!(filters.get(key), Some("v"));
            assert_eq!(filters.pairs().len(), 1);
        }
    }
}
