//! Model invocation errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur while invoking the model runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendError {
    /// The model runtime could not be launched
    SpawnError { program: String, message: String },

    /// The model did not answer within the configured timeout (in seconds)
    TimeoutError { seconds: u64 },

    /// The model runtime exited unsuccessfully without producing output
    ProcessFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The model answered with nothing but whitespace
    EmptyResponse { model: String },

    /// Generic error for other cases
    Other { message: String },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::SpawnError { program, message } => {
                write!(f, "Failed to launch model runtime '{}': {}", program, message)
            }
            BackendError::TimeoutError { seconds } => {
                write!(f, "Model did not respond within {} seconds", seconds)
            }
            BackendError::ProcessFailed { exit_code, stderr } => {
                let stderr = stderr.trim();
                match exit_code {
                    Some(code) => write!(f, "Model runtime exited with status {}", code)?,
                    None => write!(f, "Model runtime was terminated by a signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
            BackendError::EmptyResponse { model } => {
                write!(f, "Model '{}' returned an empty response", model)
            }
            BackendError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failed_display() {
        let error = BackendError::ProcessFailed {
            exit_code: Some(1),
            stderr: "model 'phi9' not found\n".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Model runtime exited with status 1: model 'phi9' not found"
        );
    }

    #[test]
    fn test_signal_display_without_stderr() {
        let error = BackendError::ProcessFailed {
            exit_code: None,
            stderr: String::new(),
        };
        assert_eq!(error.to_string(), "Model runtime was terminated by a signal");
    }

    #[test]
    fn test_timeout_display() {
        let error = BackendError::TimeoutError { seconds: 300 };
        assert!(error.to_string().contains("300"));
    }
}
