//! Plan generator trait and the subprocess-backed implementation.
//!
//! Model inference stays outside this process. The generator contract is
//! deliberately thin: prompt text in, raw model text out. Everything else
//! (extraction, repair, normalization, conflicts) happens in the pipeline.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};

/// Trait for plan text generators.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Produce raw model output for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Label recorded in plan metadata as `model_used`.
    fn label(&self) -> &str;
}

/// Generator that shells out to a configured worker command.
///
/// The worker receives `{"prompt": ..., "model": ...}` as JSON on stdin
/// and must print the raw model text to stdout. The command line is split
/// on whitespace; the first token is the program, the rest its arguments.
pub struct SubprocessGenerator {
    command: String,
    model: String,
    timeout_secs: u64,
}

impl SubprocessGenerator {
    /// Create a generator for the given worker command line.
    pub fn new(
        command: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
            timeout_secs,
        }
    }

    /// Build from configuration; `None` when no command is configured.
    pub fn from_config(config: &PlannerConfig) -> Option<Self> {
        let command = config.command.as_deref()?.trim();
        if command.is_empty() {
            return None;
        }
        Some(Self::new(command, config.model.clone(), config.timeout_secs))
    }
}

#[async_trait]
impl PlanGenerator for SubprocessGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut parts = self.command.split_whitespace();
        let program = match parts.next() {
            Some(p) => p,
            None => return Err(PlannerError::NoGenerator.into()),
        };

        debug!("Spawning plan generator: {}", self.command);
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(PlannerError::Spawn)?;

        let request = serde_json::json!({
            "prompt": prompt,
            "model": self.model,
        });
        // The timeout covers the stdin handoff too; a worker that stalls
        // before reading can leave the write blocked on a full pipe.
        let interact = async {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(request.to_string().as_bytes()).await?;
            }
            child.wait_with_output().await
        };
        let output = match tokio::time::timeout(Duration::from_secs(self.timeout_secs), interact)
            .await
        {
            Ok(result) => result.map_err(PlannerError::Io)?,
            Err(_) => return Err(PlannerError::Timeout(self.timeout_secs).into()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                "Plan generator exited with {}: {}",
                output.status,
                stderr.trim()
            );
            return Err(PlannerError::ExitStatus(output.status.code().unwrap_or(-1)).into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn label(&self) -> &str {
        &self.model
    }
}
