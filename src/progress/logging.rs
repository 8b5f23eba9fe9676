//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { project_path } => {
                info!(project = %project_path.display(), "Starting generation");
            }
            ProgressEvent::ScanComplete {
                files,
                context_chars,
                truncated,
                scan_time,
            } => {
                info!(
                    files,
                    context_chars,
                    truncated,
                    scan_time_ms = scan_time.as_millis() as u64,
                    "Project scan complete"
                );
            }
            ProgressEvent::Classified { classification } => {
                info!(classification = %classification, "Detected project type");
            }
            ProgressEvent::GenerationStarted { artifact, repair } => {
                if *repair {
                    info!(artifact = %artifact, "Asking model to repair artifact");
                } else {
                    info!(artifact = %artifact, "Generating artifact");
                }
            }
            ProgressEvent::GenerationComplete {
                artifact,
                response_chars,
                response_time,
            } => {
                debug!(
                    artifact = %artifact,
                    response_chars,
                    response_time_ms = response_time.as_millis() as u64,
                    "Model response received"
                );
            }
            ProgressEvent::GenerationFailed { artifact, error } => {
                warn!(artifact = %artifact, error = %error, "Model invocation failed");
            }
            ProgressEvent::ArtifactSaved { artifact, path } => {
                info!(artifact = %artifact, path = %path.display(), "Artifact saved");
            }
            ProgressEvent::ValidationComplete {
                artifact,
                ok,
                error,
            } => {
                if *ok {
                    info!(artifact = %artifact, "Validation passed");
                } else {
                    warn!(
                        artifact = %artifact,
                        error = error.as_deref().unwrap_or("unknown"),
                        "Validation failed"
                    );
                }
            }
            ProgressEvent::RepairOffered { path } => {
                debug!(path = %path.display(), "Offering repair");
            }
            ProgressEvent::RepairDeclined { path } => {
                warn!(path = %path.display(), "Repair declined");
            }
            ProgressEvent::Completed {
                success,
                total_time,
            } => {
                if *success {
                    info!(
                        total_time_ms = total_time.as_millis() as u64,
                        "Generation complete"
                    );
                } else {
                    warn!(
                        total_time_ms = total_time.as_millis() as u64,
                        "Generation finished without a valid Dockerfile"
                    );
                }
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Generation failed");
            }
        }
    }
}
