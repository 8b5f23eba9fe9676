use super::decider::RepairDecider;
use crate::classify::{Classification, ProjectClassifier};
use crate::llm::{BackendError, ModelClient};
use crate::output::write_artifact;
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use crate::prompt::{GenerationPurpose, GenerationRequest};
use crate::scan::{ProjectContext, ProjectScanner, ScanConfig};
use crate::validation::{ArtifactKind, ArtifactValidator, ValidationResult};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

/// Inputs of one generation run
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub project_path: PathBuf,
    pub model: String,
    pub dockerfile_path: PathBuf,
    /// `Some` requests a compose file at that path
    pub compose_path: Option<PathBuf>,
    pub scan: ScanConfig,
}

impl GenerationSettings {
    pub fn new(project_path: impl Into<PathBuf>, model: impl Into<String>) -> Self {
        Self {
            project_path: project_path.into(),
            model: model.into(),
            dockerfile_path: PathBuf::from("Dockerfile"),
            compose_path: None,
            scan: ScanConfig::default(),
        }
    }

    pub fn with_dockerfile_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dockerfile_path = path.into();
        self
    }

    pub fn with_compose_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.compose_path = Some(path.into());
        self
    }

    pub fn with_scan_config(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactOutcome {
    /// Saved and accepted by the validator
    Valid,
    /// Saved but rejected by the validator
    Invalid,
    /// The model produced nothing usable, nothing was saved
    GenerationFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactReport {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub outcome: ArtifactOutcome,
    /// A repaired version was generated and saved over the original
    pub repaired: bool,
    /// Result of the last validation, absent when nothing was saved
    pub validation: Option<ValidationResult>,
    /// Model failure that stopped this artifact, if any
    pub generation_error: Option<String>,
}

impl ArtifactReport {
    fn validated(kind: ArtifactKind, path: &Path, validation: ValidationResult) -> Self {
        Self {
            kind,
            path: path.to_path_buf(),
            outcome: if validation.ok {
                ArtifactOutcome::Valid
            } else {
                ArtifactOutcome::Invalid
            },
            repaired: false,
            validation: Some(validation),
            generation_error: None,
        }
    }

    fn generation_failed(kind: ArtifactKind, path: &Path, error: &BackendError) -> Self {
        Self {
            kind,
            path: path.to_path_buf(),
            outcome: ArtifactOutcome::GenerationFailed,
            repaired: false,
            validation: None,
            generation_error: Some(error.to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.outcome == ArtifactOutcome::Valid
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub project_path: PathBuf,
    pub model: String,
    pub classification: Classification,
    pub files_scanned: usize,
    pub context_chars: usize,
    pub context_truncated: bool,
    pub dockerfile: ArtifactReport,
    pub compose: Option<ArtifactReport>,
}

impl RunReport {
    /// Overall success depends on the Dockerfile alone
    pub fn succeeded(&self) -> bool {
        self.dockerfile.is_valid()
    }
}

/// Drives scan, classify, generate, save, validate and the optional repair
pub struct GenerationOrchestrator {
    client: Arc<dyn ModelClient>,
    validator: ArtifactValidator,
    decider: Box<dyn RepairDecider>,
    classifier: ProjectClassifier,
    progress_handler: Arc<dyn ProgressHandler>,
}

impl GenerationOrchestrator {
    pub fn new(
        client: Arc<dyn ModelClient>,
        validator: ArtifactValidator,
        decider: Box<dyn RepairDecider>,
    ) -> Self {
        Self {
            client,
            validator,
            decider,
            classifier: ProjectClassifier::default(),
            progress_handler: Arc::new(LoggingHandler),
        }
    }

    pub fn with_progress_handler(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress_handler = handler;
        self
    }

    pub fn with_classifier(mut self, classifier: ProjectClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Executes one run
    ///
    /// Model and validation failures are reported inside the [`RunReport`];
    /// only an invalid project root or an unwritable output path is an `Err`.
    pub async fn run(&self, settings: &GenerationSettings) -> Result<RunReport> {
        let start = Instant::now();
        self.emit(ProgressEvent::Started {
            project_path: settings.project_path.clone(),
        });

        let result = self.execute(settings).await;

        match &result {
            Ok(report) => self.emit(ProgressEvent::Completed {
                success: report.succeeded(),
                total_time: start.elapsed(),
            }),
            Err(e) => self.emit(ProgressEvent::Failed {
                error: format!("{:#}", e),
            }),
        }

        result
    }

    async fn execute(&self, settings: &GenerationSettings) -> Result<RunReport> {
        let scan_start = Instant::now();
        let context = ProjectScanner::with_config(settings.scan.clone())
            .scan(&settings.project_path)
            .with_context(|| {
                format!(
                    "Failed to scan project at {}",
                    settings.project_path.display()
                )
            })?;

        self.emit(ProgressEvent::ScanComplete {
            files: context.files().len(),
            context_chars: context.len_chars(),
            truncated: context.is_truncated(),
            scan_time: scan_start.elapsed(),
        });

        let classification = self
            .classifier
            .classify_excluding(&settings.project_path, &settings.scan.excluded_dirs);
        self.emit(ProgressEvent::Classified {
            classification: classification.to_string(),
        });

        let dockerfile = self
            .dockerfile_flow(settings, &context, &classification)
            .await?;

        let compose = match &settings.compose_path {
            Some(path) if dockerfile.outcome == ArtifactOutcome::GenerationFailed => {
                warn!(
                    path = %path.display(),
                    "Skipping docker-compose.yml, the model produced no Dockerfile"
                );
                None
            }
            Some(path) => Some(
                self.compose_flow(settings, path, &context, &classification)
                    .await?,
            ),
            None => None,
        };

        Ok(RunReport {
            project_path: settings.project_path.clone(),
            model: settings.model.clone(),
            classification,
            files_scanned: context.files().len(),
            context_chars: context.len_chars(),
            context_truncated: context.is_truncated(),
            dockerfile,
            compose,
        })
    }

    async fn dockerfile_flow(
        &self,
        settings: &GenerationSettings,
        context: &ProjectContext,
        classification: &Classification,
    ) -> Result<ArtifactReport> {
        let kind = ArtifactKind::Dockerfile;
        let path = settings.dockerfile_path.as_path();

        let request = GenerationRequest::new(
            context,
            classification,
            GenerationPurpose::Dockerfile,
            &settings.model,
        );
        let generated = match self.generate(kind, &request).await {
            Ok(text) => text,
            Err(e) => return Ok(ArtifactReport::generation_failed(kind, path, &e)),
        };

        self.save(kind, path, &generated)?;
        let validation = self.validate(kind, path, &settings.project_path).await;
        if validation.ok {
            return Ok(ArtifactReport::validated(kind, path, validation));
        }

        self.emit(ProgressEvent::RepairOffered {
            path: path.to_path_buf(),
        });
        if !self.decider.confirm_repair(path, &validation) {
            self.emit(ProgressEvent::RepairDeclined {
                path: path.to_path_buf(),
            });
            return Ok(ArtifactReport::validated(kind, path, validation));
        }

        let repair_request = GenerationRequest::repair(
            context,
            classification,
            &settings.model,
            &generated,
            validation.error_text(),
        );
        let repaired = match self.generate(kind, &repair_request).await {
            Ok(text) => text,
            Err(e) => {
                let mut report = ArtifactReport::validated(kind, path, validation);
                report.generation_error = Some(e.to_string());
                return Ok(report);
            }
        };

        self.save(kind, path, &repaired)?;
        let revalidation = self.validate(kind, path, &settings.project_path).await;
        if !revalidation.ok {
            error!(
                path = %path.display(),
                error = revalidation.error_text().unwrap_or("unknown"),
                "Repaired Dockerfile still fails validation"
            );
        }

        let mut report = ArtifactReport::validated(kind, path, revalidation);
        report.repaired = true;
        Ok(report)
    }

    async fn compose_flow(
        &self,
        settings: &GenerationSettings,
        path: &Path,
        context: &ProjectContext,
        classification: &Classification,
    ) -> Result<ArtifactReport> {
        let kind = ArtifactKind::Compose;

        let request = GenerationRequest::new(
            context,
            classification,
            GenerationPurpose::Compose,
            &settings.model,
        );
        let generated = match self.generate(kind, &request).await {
            Ok(text) => text,
            Err(e) => return Ok(ArtifactReport::generation_failed(kind, path, &e)),
        };

        self.save(kind, path, &generated)?;
        let validation = self.validate(kind, path, &settings.project_path).await;
        if !validation.ok {
            warn!(
                path = %path.display(),
                "docker-compose.yml needs manual review before use"
            );
        }

        Ok(ArtifactReport::validated(kind, path, validation))
    }

    async fn generate(
        &self,
        kind: ArtifactKind,
        request: &GenerationRequest<'_>,
    ) -> Result<String, BackendError> {
        self.emit(ProgressEvent::GenerationStarted {
            artifact: kind,
            repair: request.purpose == GenerationPurpose::Repair,
        });

        let started = Instant::now();
        match self.client.generate(request.model, &request.prompt()).await {
            Ok(text) => {
                self.emit(ProgressEvent::GenerationComplete {
                    artifact: kind,
                    response_chars: text.chars().count(),
                    response_time: started.elapsed(),
                });
                Ok(text)
            }
            Err(e) => {
                self.emit(ProgressEvent::GenerationFailed {
                    artifact: kind,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn save(&self, kind: ArtifactKind, path: &Path, content: &str) -> Result<()> {
        write_artifact(path, content)
            .with_context(|| format!("Failed to save {} to {}", kind, path.display()))?;
        self.emit(ProgressEvent::ArtifactSaved {
            artifact: kind,
            path: path.to_path_buf(),
        });
        Ok(())
    }

    async fn validate(
        &self,
        kind: ArtifactKind,
        path: &Path,
        build_context: &Path,
    ) -> ValidationResult {
        let result = match kind {
            ArtifactKind::Dockerfile => {
                self.validator
                    .validate_dockerfile(path, build_context)
                    .await
            }
            ArtifactKind::Compose => self.validator.validate_compose(path).await,
        };

        self.emit(ProgressEvent::ValidationComplete {
            artifact: kind,
            ok: result.ok,
            error: result.error.clone(),
        });
        result
    }

    fn emit(&self, event: ProgressEvent) {
        self.progress_handler.on_progress(&event);
    }
}
