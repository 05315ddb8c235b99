use super::CompletionService;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::CompletionConfig;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tracing::{debug, warn};

/// Runs `<command> run <model> <prompt>` once per completion and returns its stdout.
///
/// A non-zero exit status produces an empty completion; only a command that
/// cannot be started is reported as unavailable.
pub struct CommandClient {
    program: String,
    config: CompletionConfig,
}

impl CommandClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let program = config
            .command
            .clone()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError("The command provider requires `command`".to_string())
            })?;
        Ok(Self { program, config })
    }
}

#[async_trait]
impl CompletionService for CommandClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let mut cmd = TokioCommand::new(&self.program);
        cmd.arg("run")
            .arg(&self.config.model)
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Spawning {} run {}", self.program, self.config.model);

        let output = match self.config.timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), cmd.output())
                .await
                .map_err(|_| {
                    AppError::ServiceUnavailable(format!(
                        "'{}' did not finish within {} seconds",
                        self.program, secs
                    ))
                })?,
            None => cmd.output().await,
        }
        .map_err(|e| {
            AppError::ServiceUnavailable(format!("Failed to run '{}': {}", self.program, e))
        })?;

        if !output.status.success() {
            warn!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(String::new());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
