//! Validation of generated artifacts
//!
//! A generated file first passes cheap structural checks
//! ([`StructuralRule`]s) and only then is handed to the container engine.
//! Every outcome, including an engine that cannot be launched, is reported as
//! a [`ValidationResult`] value rather than an error.

pub mod engine;
pub mod rules;
pub mod validator;

pub use engine::{
    ContainerEngine, DockerCliEngine, EngineCall, EngineReport, MockEngine, MockOutcome,
};
pub use rules::{RequiredTokensRule, StructuralRule};
pub use validator::ArtifactValidator;

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// The two kinds of file this tool generates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Dockerfile,
    Compose,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Dockerfile => write!(f, "Dockerfile"),
            ArtifactKind::Compose => write!(f, "docker-compose.yml"),
        }
    }
}

/// Where a failed validation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    NotFound,
    Structural,
    Engine,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::NotFound => write!(f, "not found"),
            FailureStage::Structural => write!(f, "structural check"),
            FailureStage::Engine => write!(f, "engine check"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub error: Option<String>,
    pub stage: Option<FailureStage>,
}

impl ValidationResult {
    pub fn passed() -> Self {
        Self {
            ok: true,
            error: None,
            stage: None,
        }
    }

    pub fn not_found(path: &Path) -> Self {
        Self::failed(
            FailureStage::NotFound,
            format!("File not found: {}", path.display()),
        )
    }

    pub fn structural(error: impl Into<String>) -> Self {
        Self::failed(FailureStage::Structural, error)
    }

    pub fn engine(error: impl Into<String>) -> Self {
        Self::failed(FailureStage::Engine, error)
    }

    fn failed(stage: FailureStage, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            stage: Some(stage),
        }
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
