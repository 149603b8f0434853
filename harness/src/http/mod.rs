//! HTTP layer
//!
//! Auth header construction, filter-aware rules-URL building, and the
//! reqwest client over the Grafana folder and rules endpoints.

mod auth;
mod client;
mod query;

pub use auth::build_request_params;
pub use client::GrafanaClient;
pub use query::{FILTERED_GROUP_LIMIT, FilterKey, RULES_PATH, RuleFilters, build_rules_url};
