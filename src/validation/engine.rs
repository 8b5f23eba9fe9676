//! Container engine boundary
//!
//! The engine is only asked two questions: does this Dockerfile build, and is
//! this compose file well formed. Both are answered by exit status plus
//! stderr.

use crate::util::process::{run_process, ProcessError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Answer of one engine check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineReport {
    pub ok: bool,
    pub stderr: String,
}

impl EngineReport {
    pub fn success() -> Self {
        Self {
            ok: true,
            stderr: String::new(),
        }
    }

    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            ok: false,
            stderr: stderr.into(),
        }
    }
}

#[async_trait]
pub trait ContainerEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Builds `dockerfile` against `context_dir`
    async fn build_check(
        &self,
        dockerfile: &Path,
        context_dir: &Path,
    ) -> Result<EngineReport, ProcessError>;

    /// Parses `compose_file` without starting anything
    async fn compose_check(&self, compose_file: &Path) -> Result<EngineReport, ProcessError>;
}

/// Engine driven through the `docker` (or compatible) CLI
pub struct DockerCliEngine {
    command: String,
    timeout: Duration,
}

impl DockerCliEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self::with_timeout(command, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build_args(dockerfile: &Path, context_dir: &Path) -> Vec<String> {
        vec![
            "build".to_string(),
            "--file".to_string(),
            dockerfile.to_string_lossy().into_owned(),
            context_dir.to_string_lossy().into_owned(),
        ]
    }

    fn compose_args(compose_file: &Path) -> Vec<String> {
        vec![
            "compose".to_string(),
            "-f".to_string(),
            compose_file.to_string_lossy().into_owned(),
            "config".to_string(),
            "--quiet".to_string(),
        ]
    }

    async fn check(&self, args: Vec<String>) -> Result<EngineReport, ProcessError> {
        let output = run_process(&self.command, &args, None, Some(self.timeout)).await?;
        if output.success() {
            Ok(EngineReport::success())
        } else {
            debug!(
                engine = %self.command,
                exit_code = ?output.exit_code,
                "Engine check failed"
            );
            Ok(EngineReport::failure(output.stderr))
        }
    }
}

impl Default for DockerCliEngine {
    fn default() -> Self {
        Self::new("docker")
    }
}

#[async_trait]
impl ContainerEngine for DockerCliEngine {
    fn name(&self) -> &str {
        &self.command
    }

    async fn build_check(
        &self,
        dockerfile: &Path,
        context_dir: &Path,
    ) -> Result<EngineReport, ProcessError> {
        debug!(
            dockerfile = %dockerfile.display(),
            context = %context_dir.display(),
            "Running engine build check"
        );
        self.check(Self::build_args(dockerfile, context_dir)).await
    }

    async fn compose_check(&self, compose_file: &Path) -> Result<EngineReport, ProcessError> {
        debug!(compose = %compose_file.display(), "Running engine compose check");
        self.check(Self::compose_args(compose_file)).await
    }
}

/// Scripted outcome for [`MockEngine`]
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Pass,
    Fail(String),
    LaunchError(String),
}

/// Records which engine check was requested and for which file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Build { dockerfile: PathBuf },
    Compose { compose_file: PathBuf },
}

/// Test double replaying scripted outcomes; passes once the script runs out
pub struct MockEngine {
    outcomes: Mutex<VecDeque<MockOutcome>>,
    calls: Mutex<Vec<EngineCall>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_outcomes(outcomes: impl IntoIterator<Item = MockOutcome>) -> Self {
        let engine = Self::new();
        engine.outcomes.lock().unwrap().extend(outcomes);
        engine
    }

    pub fn add_outcome(&self, outcome: MockOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next(&self, call: EngineCall) -> Result<EngineReport, ProcessError> {
        self.calls.lock().unwrap().push(call);
        match self.outcomes.lock().unwrap().pop_front() {
            None | Some(MockOutcome::Pass) => Ok(EngineReport::success()),
            Some(MockOutcome::Fail(stderr)) => Ok(EngineReport::failure(stderr)),
            Some(MockOutcome::LaunchError(message)) => Err(ProcessError::Spawn {
                program: "mock-engine".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, message),
            }),
        }
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContainerEngine for MockEngine {
    fn name(&self) -> &str {
        "MockEngine"
    }

    async fn build_check(
        &self,
        dockerfile: &Path,
        _context_dir: &Path,
    ) -> Result<EngineReport, ProcessError> {
        self.next(EngineCall::Build {
            dockerfile: dockerfile.to_path_buf(),
        })
    }

    async fn compose_check(&self, compose_file: &Path) -> Result<EngineReport, ProcessError> {
        self.next(EngineCall::Compose {
            compose_file: compose_file.to_path_buf(),
        })
    }
}
