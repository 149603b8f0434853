//! HTTP client for the Grafana folder and rules endpoints

use crate::http::query::{RuleFilters, build_rules_url};
use reqwest::Method;
use shared::{Folder, HarnessError, HarnessResult, RequestParams, RuleGroup, RulesResponse};
use std::time::Duration;

/// Client over the folder and Prometheus-compatible rules endpoints.
///
/// Wraps one shared `reqwest::Client` plus the immutable request parameters;
/// cheap to clone into concurrent scenario iterations.
#[derive(Clone, Debug)]
pub struct GrafanaClient {
    base_url: String,
    client: reqwest::Client,
    params: RequestParams,
}

impl GrafanaClient {
    pub fn new(base_url: &str, params: RequestParams) -> HarnessResult<Self> {
        url::Url::parse(base_url).map_err(|e| HarnessError::InvalidConfig {
            field: "GRAFANA_URL".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HarnessError::Http {
                url: base_url.to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            params,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, url);
        for (name, value) in &self.params.headers {
            builder = builder.header(name, value);
        }
        builder
    }

    async fn send(&self, method: Method, url: &str) -> HarnessResult<reqwest::Response> {
        self.request(method, url)
            .send()
            .await
            .map_err(|e| HarnessError::Http {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    /// Look up a folder by uid. 200 means it exists, 404 that it doesn't;
    /// anything else is an error for the caller to log or propagate.
    pub async fn folder_exists(&self, uid: &str) -> HarnessResult<bool> {
        let url = format!("{}/api/folders/{uid}", self.base_url);
        let response = self.send(Method::GET, &url).await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            reqwest::StatusCode::NOT_FOUND => Ok(false),
            status => Err(HarnessError::Http {
                url,
                message: format!("unexpected status {status}"),
            }),
        }
    }

    pub async fn create_folder(&self, folder: &Folder) -> HarnessResult<()> {
        let url = format!("{}/api/folders", self.base_url);
        let response = self
            .request(Method::POST, &url)
            .json(folder)
            .send()
            .await
            .map_err(|e| HarnessError::Http {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(HarnessError::Http {
                url,
                message: format!("create folder '{}' failed with status {}", folder.uid, response.status()),
            });
        }
        Ok(())
    }

    /// Delete a folder, cascading to the rules inside it. Deleting a folder
    /// that no longer exists succeeds, so repeated teardowns are safe.
    pub async fn delete_folder(&self, uid: &str) -> HarnessResult<()> {
        let url = format!("{}/api/folders/{uid}?forceDeleteRules=true", self.base_url);
        let response = self.send(Method::DELETE, &url).await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::NOT_FOUND => Ok(()),
            status => Err(HarnessError::Http {
                url,
                message: format!("delete folder '{uid}' failed with status {status}"),
            }),
        }
    }

    /// Query the rules endpoint and return the contained groups.
    pub async fn query_rules(
        &self,
        filters: &RuleFilters,
        group_limit: u32,
    ) -> HarnessResult<Vec<RuleGroup>> {
        let url = build_rules_url(&self.base_url, filters, group_limit);
        let response = self.send(Method::GET, &url).await?;

        if !response.status().is_success() {
            return Err(HarnessError::Http {
                url,
                message: format!("rules query failed with status {}", response.status()),
            });
        }

        let parsed: RulesResponse = response.json().await.map_err(|e| HarnessError::ResponseShape {
            url,
            message: e.to_string(),
        })?;
        Ok(parsed.data.groups)
    }
}
