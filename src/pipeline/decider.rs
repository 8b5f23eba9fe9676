//! Operator confirmation before the single repair attempt

use crate::validation::ValidationResult;
use dialoguer::Confirm;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{info, warn};

/// Decides whether a failed Dockerfile is sent back to the model once
pub trait RepairDecider: Send + Sync {
    fn confirm_repair(&self, path: &Path, result: &ValidationResult) -> bool;
}

impl<T: RepairDecider + ?Sized> RepairDecider for Arc<T> {
    fn confirm_repair(&self, path: &Path, result: &ValidationResult) -> bool {
        (**self).confirm_repair(path, result)
    }
}

/// Asks on the terminal; declines when stdin is not interactive
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalDecider;

impl RepairDecider for TerminalDecider {
    fn confirm_repair(&self, path: &Path, result: &ValidationResult) -> bool {
        if !atty::is(atty::Stream::Stdin) {
            info!("Standard input is not a terminal, not attempting a repair");
            return false;
        }

        let stage = result
            .stage
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown stage".to_string());

        let prompt = format!(
            "{} failed validation ({}). Ask the model to fix it?",
            path.display(),
            stage
        );
        match run_blocking(|| Confirm::new().with_prompt(prompt).default(true).interact()) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Could not read confirmation, not attempting a repair");
                false
            }
        }
    }
}

/// Runs a blocking terminal read, moving off the async worker when the
/// multi-threaded runtime allows it
fn run_blocking<T>(read: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(read)
        }
        _ => read(),
    }
}

/// Always gives the same answer (`--yes` / `--no-repair`)
#[derive(Debug, Clone, Copy)]
pub struct FixedDecider(pub bool);

impl RepairDecider for FixedDecider {
    fn confirm_repair(&self, _path: &Path, _result: &ValidationResult) -> bool {
        self.0
    }
}

/// Replays queued answers and records every question; declines once empty
#[derive(Debug, Default)]
pub struct ScriptedDecider {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<(PathBuf, ValidationResult)>>,
}

impl ScriptedDecider {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.lock().unwrap().len()
    }

    pub fn questions(&self) -> Vec<(PathBuf, ValidationResult)> {
        self.asked.lock().unwrap().clone()
    }
}

impl RepairDecider for ScriptedDecider {
    fn confirm_repair(&self, path: &Path, result: &ValidationResult) -> bool {
        self.asked
            .lock()
            .unwrap()
            .push((path.to_path_buf(), result.clone()));
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_blocking_outside_runtime() {
        assert_eq!(run_blocking(|| 7), 7);
    }

    #[tokio::test]
    async fn test_run_blocking_on_current_thread_runtime() {
        assert_eq!(run_blocking(|| "yes"), "yes");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_blocking_on_multi_thread_runtime() {
        let other = tokio::spawn(async { 1 });
        assert!(run_blocking(|| true));
        assert_eq!(other.await.unwrap(), 1);
    }

    #[test]
    fn test_fixed_decider() {
        let failure = ValidationResult::structural("missing CMD");
        assert!(FixedDecider(true).confirm_repair(Path::new("Dockerfile"), &failure));
        assert!(!FixedDecider(false).confirm_repair(Path::new("Dockerfile"), &failure));
    }

    #[test]
    fn test_scripted_decider_records_questions() {
        let decider = ScriptedDecider::new(vec![true]);
        let failure = ValidationResult::engine("build failed");

        assert!(decider.confirm_repair(Path::new("out/Dockerfile"), &failure));
        assert!(!decider.confirm_repair(Path::new("out/Dockerfile"), &failure));

        assert_eq!(decider.times_asked(), 2);
        let (path, result) = &decider.questions()[0];
        assert_eq!(path, Path::new("out/Dockerfile"));
        assert_eq!(result, &failure);
    }
}
