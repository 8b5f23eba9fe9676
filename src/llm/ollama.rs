//! Model client driving a local model runtime through its CLI
//!
//! The prompt is written to `<command> run <model>` on stdin and whatever the
//! process prints to stdout is the completion.
//!
//! # Example
//!
//! ```no_run
//! use dockgen::llm::{ModelClient, OllamaCliClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaCliClient::with_timeout("ollama", Duration::from_secs(120));
//! let dockerfile = client.generate("phi3", "Write a Dockerfile for ...").await?;
//! println!("{}", dockerfile);
//! # Ok(())
//! # }
//! ```

use super::client::ModelClient;
use super::error::BackendError;
use crate::util::process::{run_process, ProcessError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for a single completion
const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub struct OllamaCliClient {
    /// Executable of the model runtime
    command: String,

    /// Upper bound for one invocation
    timeout: Duration,
}

impl OllamaCliClient {
    pub fn new(command: impl Into<String>) -> Self {
        Self::with_timeout(command, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for OllamaCliClient {
    fn default() -> Self {
        Self::new("ollama")
    }
}

#[async_trait]
impl ModelClient for OllamaCliClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError> {
        debug!(
            model,
            prompt_chars = prompt.chars().count(),
            timeout_secs = self.timeout.as_secs(),
            "Invoking model"
        );

        let args = vec!["run".to_string(), model.to_string()];
        let output = run_process(&self.command, &args, Some(prompt), Some(self.timeout))
            .await
            .map_err(|e| match e {
                ProcessError::Timeout { seconds, .. } => BackendError::TimeoutError { seconds },
                ProcessError::Spawn { program, source } => BackendError::SpawnError {
                    program,
                    message: source.to_string(),
                },
                other => BackendError::Other {
                    message: other.to_string(),
                },
            })?;

        if !output.success() {
            if output.stdout.trim().is_empty() {
                return Err(BackendError::ProcessFailed {
                    exit_code: output.exit_code,
                    stderr: output.stderr,
                });
            }
            warn!(
                model,
                exit_code = ?output.exit_code,
                stderr = %output.stderr.trim(),
                "Model runtime exited unsuccessfully, keeping its partial output"
            );
        }

        if output.stdout.trim().is_empty() {
            return Err(BackendError::EmptyResponse {
                model: model.to_string(),
            });
        }

        debug!(
            model,
            response_chars = output.stdout.chars().count(),
            elapsed_ms = output.elapsed.as_millis() as u64,
            "Model responded"
        );

        Ok(output.stdout)
    }

    fn name(&self) -> &str {
        &self.command
    }
}
