//! Rule Generator seam
//!
//! Rule synthesis and bulk upload live outside the harness. The trait is the
//! whole contract: one call turning a [`GenerateConfig`] into folders of
//! rule groups (or, with `nuke`, deleting previously generated data). The
//! shipped implementation shells out to the generator command; tests
//! substitute mocks.

use async_trait::async_trait;
use shared::{GenerateConfig, GenerateOutput, HarnessError, HarnessResult};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::env_or_default;

#[async_trait]
pub trait RuleGenerator: Send + Sync {
    async fn generate(&self, config: &GenerateConfig) -> HarnessResult<GenerateOutput>;
}

/// Generator implementation invoking an external command.
///
/// The JSON-encoded config goes to the command's stdin; the command writes
/// a JSON [`GenerateOutput`] to stdout. The command name comes from
/// `ALERTING_GEN_CMD` (default `alerting-gen`).
pub struct CommandGenerator {
    program: String,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(env_or_default("ALERTING_GEN_CMD", "alerting-gen"))
    }
}

#[async_trait]
impl RuleGenerator for CommandGenerator {
    async fn generate(&self, config: &GenerateConfig) -> HarnessResult<GenerateOutput> {
        let payload = serde_json::to_vec(config).map_err(|e| HarnessError::Generator {
            message: format!("failed to encode generator config: {e}"),
        })?;

        tracing::info!(
            "🛠 Invoking rule generator '{}' (alerting: {}, recording: {}, nuke: {})",
            self.program,
            config.alert_rule_count,
            config.recording_rule_count,
            config.nuke
        );

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| HarnessError::Generator {
                message: format!("failed to spawn '{}': {e}", self.program),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).await.map_err(|e| HarnessError::Generator {
                message: format!("failed to write config to '{}': {e}", self.program),
            })?;
        }

        let output = child.wait_with_output().await.map_err(|e| HarnessError::Generator {
            message: format!("failed to wait for '{}': {e}", self.program),
        })?;

        if !output.status.success() {
            return Err(HarnessError::Generator {
                message: format!("'{}' exited with {}", self.program, output.status),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| HarnessError::Generator {
            message: format!("invalid generator output: {e}"),
        })
    }
}
