//! Grafana connection configuration
//!
//! Resolved from environment variables with documented defaults.

use shared::UploadConfig;
use std::env;

/// Look up an externally supplied named value; absent or empty means the
/// default applies.
pub fn env_or_default(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Connection and credential settings for the target Grafana instance.
#[derive(Debug, Clone, PartialEq)]
pub struct GrafanaConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub token: String,
}

impl GrafanaConfig {
    /// Resolve the four connection settings from the environment.
    ///
    /// | variable                 | default                 |
    /// |--------------------------|-------------------------|
    /// | `GRAFANA_URL`            | `http://localhost:3000` |
    /// | `GRAFANA_ADMIN_USER`     | `admin`                 |
    /// | `GRAFANA_ADMIN_PASSWORD` | `admin`                 |
    /// | `GRAFANA_API_TOKEN`      | empty                   |
    ///
    /// No validation beyond defaulting; an empty token selects basic auth
    /// downstream.
    pub fn from_env() -> Self {
        Self {
            url: env_or_default("GRAFANA_URL", "http://localhost:3000"),
            username: env_or_default("GRAFANA_ADMIN_USER", "admin"),
            password: env_or_default("GRAFANA_ADMIN_PASSWORD", "admin"),
            token: env_or_default("GRAFANA_API_TOKEN", ""),
        }
    }

    /// Upload target for Generator calls. A non-empty token supersedes the
    /// admin user entirely; username and password are then left unset.
    pub fn upload_config(&self, folder_uids: Vec<String>) -> UploadConfig {
        let (username, password, token) = if self.token.is_empty() {
            (Some(self.username.clone()), Some(self.password.clone()), None)
        } else {
            (None, None, Some(self.token.clone()))
        };

        UploadConfig {
            grafana_url: self.url.clone(),
            username,
            password,
            token,
            org_id: Some(1),
            folder_uids,
        }
    }
}
