//! Folder and rule-data provisioning
//!
//! Setup and teardown are single sequential phases: folder round-trips are
//! issued one at a time, and folder counts stay bounded (hundreds to low
//! thousands) relative to the phase timeouts. Individual HTTP failures are
//! logged, recorded, and never abort the phase; only a Generator failure is
//! fatal, since every assertion depends on the generated data existing.

use crate::http::GrafanaClient;
use crate::runtime::generator::RuleGenerator;
use shared::{Folder, GenerateConfig, GenerateOutput, HarnessResult, UploadConfig};

/// Uid prefix of every folder this harness creates.
pub const FOLDER_UID_BASE: &str = "load-test-folder-";

pub struct DataProvisioner {
    client: GrafanaClient,
    generator: Box<dyn RuleGenerator>,
}

impl DataProvisioner {
    pub fn new(client: GrafanaClient, generator: Box<dyn RuleGenerator>) -> Self {
        Self { client, generator }
    }

    pub fn client(&self) -> &GrafanaClient {
        &self.client
    }

    /// Specs for `count` indexed folders under the base uid.
    pub fn folder_specs(count: u64) -> Vec<Folder> {
        (0..count)
            .map(|i| Folder {
                uid: format!("{FOLDER_UID_BASE}{i}"),
                title: format!("Load test folder {i}"),
                description: "Auto-generated alerting load test data".to_string(),
            })
            .collect()
    }

    /// Create every folder in `specs`, folder by folder.
    ///
    /// A folder found to already exist is cleared via a delete of the base
    /// uid before recreation. Creation is attempted unconditionally and the
    /// returned list holds every attempted uid, failed creates included —
    /// callers own the full list for teardown either way.
    pub async fn provision_folders(&self, specs: &[Folder]) -> Vec<String> {
        tracing::info!("📁 Provisioning {} folders", specs.len());

        let mut attempted = Vec::with_capacity(specs.len());
        for spec in specs {
            match self.client.folder_exists(&spec.uid).await {
                Ok(true) => {
                    if let Err(e) = self.client.delete_folder(FOLDER_UID_BASE).await {
                        tracing::warn!("⚠️ Failed to delete folder '{FOLDER_UID_BASE}': {e}");
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("⚠️ Folder lookup for '{}' failed: {e}", spec.uid);
                }
            }

            if let Err(e) = self.client.create_folder(spec).await {
                tracing::warn!("⚠️ Failed to create folder '{}': {e}", spec.uid);
            }
            attempted.push(spec.uid.clone());
        }

        tracing::info!("✅ Folder provisioning attempted {} uids", attempted.len());
        attempted
    }

    /// Run the Generator once. Failures propagate: without generated data
    /// the scenario assertions are meaningless.
    pub async fn generate_rule_data(&self, config: &GenerateConfig) -> HarnessResult<GenerateOutput> {
        tracing::info!("🏗 Generating rule data in Grafana");
        let output = self.generator.generate(config).await?;
        tracing::info!("✅ Generator produced {} groups", output.groups.len());
        Ok(output)
    }

    /// Delete every folder in `uids` with cascading rule deletion.
    ///
    /// Best-effort: each failure is logged and the remaining folders are
    /// still attempted, so a partial earlier teardown cannot strand the
    /// rest. Folders already gone count as deleted.
    pub async fn teardown_folders(&self, uids: &[String]) {
        tracing::info!("🧹 Tearing down {} folders", uids.len());
        for uid in uids {
            if let Err(e) = self.client.delete_folder(uid).await {
                tracing::warn!("⚠️ Failed to delete folder '{uid}': {e}");
            }
        }
    }

    /// One Generator call that deletes all previously auto-generated data.
    pub async fn nuke(&self, upload: UploadConfig) -> HarnessResult<()> {
        tracing::info!("💥 Nuking previously generated data");
        self.generator
            .generate(&GenerateConfig::nuke_only(upload))
            .await
            .map(|_| ())
    }
}
