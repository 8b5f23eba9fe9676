//! Bounded execution of external processes
//!
//! The model runtime and the container engine are both driven as child
//! processes. Every invocation goes through [`run_process`], which feeds
//! optional stdin, captures both output streams leniently decoded, and kills
//! the child if it outlives the timeout.

use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("'{program}' did not finish within {seconds} seconds")]
    Timeout { program: String, seconds: u64 },

    #[error("I/O error while running '{program}': {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },
}

/// Captured result of a finished process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs `program` with `args`, optionally writing `stdin` to it
///
/// A `timeout` of `None` waits indefinitely.
pub async fn run_process(
    program: &str,
    args: &[String],
    stdin: Option<&str>,
    timeout: Option<Duration>,
) -> Result<ProcessOutput, ProcessError> {
    debug!(program, ?args, "Launching external process");
    let start = Instant::now();

    let mut child = Command::new(program)
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: program.to_string(),
            source,
        })?;

    // Written from a separate task so a child that streams output before
    // draining its input cannot deadlock against us.
    let writer = match (stdin, child.stdin.take()) {
        (Some(input), Some(mut pipe)) => {
            let bytes = input.as_bytes().to_vec();
            let name = program.to_string();
            Some(tokio::spawn(async move {
                if let Err(e) = pipe.write_all(&bytes).await {
                    warn!(program = %name, error = %e, "Failed to write process stdin");
                }
                let _ = pipe.shutdown().await;
            }))
        }
        _ => None,
    };

    let wait = child.wait_with_output();
    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, wait).await {
            Ok(result) => result,
            Err(_) => {
                return Err(ProcessError::Timeout {
                    program: program.to_string(),
                    seconds: limit.as_secs(),
                })
            }
        },
        None => wait.await,
    }
    .map_err(|source| ProcessError::Io {
        program: program.to_string(),
        source,
    })?;

    if let Some(handle) = writer {
        let _ = handle.await;
    }

    let result = ProcessOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        elapsed: start.elapsed(),
    };

    debug!(
        program,
        exit_code = ?result.exit_code,
        stdout_bytes = result.stdout.len(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "External process finished"
    );

    Ok(result)
}
