use super::engine::{ContainerEngine, EngineReport};
use super::rules::{RequiredTokensRule, StructuralRule};
use super::{ArtifactKind, ValidationResult};
use crate::util::process::ProcessError;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct ArtifactValidator {
    engine: Arc<dyn ContainerEngine>,
    dockerfile_rules: Vec<Box<dyn StructuralRule>>,
    compose_rules: Vec<Box<dyn StructuralRule>>,
}

impl ArtifactValidator {
    pub fn new(engine: Arc<dyn ContainerEngine>) -> Self {
        Self::with_rules(
            engine,
            vec![Box::new(RequiredTokensRule::dockerfile())],
            vec![Box::new(RequiredTokensRule::compose())],
        )
    }

    pub fn with_rules(
        engine: Arc<dyn ContainerEngine>,
        dockerfile_rules: Vec<Box<dyn StructuralRule>>,
        compose_rules: Vec<Box<dyn StructuralRule>>,
    ) -> Self {
        Self {
            engine,
            dockerfile_rules,
            compose_rules,
        }
    }

    /// Validates a Dockerfile, building it against `build_context`
    pub async fn validate_dockerfile(&self, path: &Path, build_context: &Path) -> ValidationResult {
        if let Some(failure) = self.precheck(ArtifactKind::Dockerfile, path) {
            return failure;
        }

        let outcome = self.engine.build_check(path, build_context).await;
        Self::from_engine(ArtifactKind::Dockerfile, path, outcome)
    }

    pub async fn validate_compose(&self, path: &Path) -> ValidationResult {
        if let Some(failure) = self.precheck(ArtifactKind::Compose, path) {
            return failure;
        }

        let outcome = self.engine.compose_check(path).await;
        Self::from_engine(ArtifactKind::Compose, path, outcome)
    }

    /// Existence and structural checks; `Some` means validation already failed
    fn precheck(&self, kind: ArtifactKind, path: &Path) -> Option<ValidationResult> {
        if !path.is_file() {
            debug!(artifact = %kind, path = %path.display(), "Artifact not found");
            return Some(ValidationResult::not_found(path));
        }

        let content = match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!(artifact = %kind, path = %path.display(), error = %e, "Artifact unreadable");
                return Some(ValidationResult::structural(format!(
                    "Could not read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let rules = match kind {
            ArtifactKind::Dockerfile => &self.dockerfile_rules,
            ArtifactKind::Compose => &self.compose_rules,
        };

        for rule in rules {
            if let Err(e) = rule.validate(&content) {
                debug!(artifact = %kind, rule = rule.name(), error = %e, "Structural check failed");
                return Some(ValidationResult::structural(format!(
                    "[{}] {}",
                    rule.name(),
                    e
                )));
            }
        }

        debug!(artifact = %kind, "Structural checks passed");
        None
    }

    fn from_engine(
        kind: ArtifactKind,
        path: &Path,
        outcome: Result<EngineReport, ProcessError>,
    ) -> ValidationResult {
        match outcome {
            Ok(report) if report.ok => {
                debug!(artifact = %kind, path = %path.display(), "Artifact is valid");
                ValidationResult::passed()
            }
            Ok(report) => {
                debug!(artifact = %kind, error = %report.stderr.trim(), "Engine rejected artifact");
                ValidationResult::engine(report.stderr.trim().to_string())
            }
            Err(e) => {
                debug!(artifact = %kind, error = %e, "Engine check could not run");
                ValidationResult::engine(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::engine::{EngineCall, MockEngine, MockOutcome};
    use crate::validation::FailureStage;
    use std::fs;
    use tempfile::TempDir;

    fn validator(engine: &Arc<MockEngine>) -> ArtifactValidator {
        ArtifactValidator::new(engine.clone())
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_valid_dockerfile() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Dockerfile", "FROM python:3.11\nCMD [\"python\",\"app.py\"]");
        let engine = Arc::new(MockEngine::new());

        let result = validator(&engine).validate_dockerfile(&path, dir.path()).await;

        assert!(result.ok);
        assert_eq!(
            engine.calls(),
            vec![EngineCall::Build {
                dockerfile: path.clone()
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_cmd_skips_engine() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Dockerfile", "FROM python:3.11\nRUN pip install flask");
        let engine = Arc::new(MockEngine::new());

        let result = validator(&engine).validate_dockerfile(&path, dir.path()).await;

        assert!(!result.ok);
        assert_eq!(result.stage, Some(FailureStage::Structural));
        assert!(result.error_text().unwrap().contains("CMD"));
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let engine = Arc::new(MockEngine::new());

        let result = validator(&engine)
            .validate_dockerfile(&dir.path().join("Dockerfile"), dir.path())
            .await;

        assert_eq!(result.stage, Some(FailureStage::NotFound));
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_engine_failure_carries_stderr() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Dockerfile", "FROM nope\nCMD x");
        let engine = Arc::new(MockEngine::with_outcomes(vec![MockOutcome::Fail(
            "pull access denied for nope\n".to_string(),
        )]));

        let result = validator(&engine).validate_dockerfile(&path, dir.path()).await;

        assert_eq!(result.stage, Some(FailureStage::Engine));
        assert_eq!(result.error_text(), Some("pull access denied for nope"));
    }

    #[tokio::test]
    async fn test_engine_launch_error_is_a_result() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "docker-compose.yml", "services:\n  app:\n    build: .\n");
        let engine = Arc::new(MockEngine::with_outcomes(vec![MockOutcome::LaunchError(
            "docker not installed".to_string(),
        )]));

        let result = validator(&engine).validate_compose(&path).await;

        assert!(!result.ok);
        assert_eq!(result.stage, Some(FailureStage::Engine));
        assert!(result.error_text().unwrap().contains("docker not installed"));
    }

    #[tokio::test]
    async fn test_compose_without_services() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "docker-compose.yml", "version: '3'\n");
        let engine = Arc::new(MockEngine::new());

        let result = validator(&engine).validate_compose(&path).await;

        assert_eq!(result.stage, Some(FailureStage::Structural));
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_read_leniently() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Dockerfile");
        fs::write(&path, b"FROM alpine\n# \xff\xfe\nCMD [\"sh\"]").unwrap();
        let engine = Arc::new(MockEngine::new());

        let result = validator(&engine).validate_dockerfile(&path, dir.path()).await;

        assert!(result.ok);
    }
}
