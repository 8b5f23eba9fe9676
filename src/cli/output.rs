//! Output formatting for run summaries
//!
//! A finished [`RunReport`] is rendered as JSON, YAML or human-readable text.
//!
//! # Example
//!
//! ```ignore
//! use dockgen::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! println!("{}", formatter.format(&report)?);
//! ```

use anyhow::{Context, Result};

use crate::pipeline::{ArtifactOutcome, ArtifactReport, RunReport};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize run report to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize run report to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(report)),
        }
    }

    fn format_human(&self, report: &RunReport) -> String {
        let mut output = String::new();

        if report.succeeded() {
            output.push_str("\u{2713} Dockerfile Generated\n");
        } else {
            output.push_str("\u{2717} Dockerfile Generation Failed\n");
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!("Project:   {}\n", report.project_path.display()));
        output.push_str(&format!("Detected:  {}\n", report.classification));
        output.push_str(&format!("Model:     {}\n", report.model));
        output.push_str(&format!(
            "Context:   {} files, {} chars{}\n\n",
            report.files_scanned,
            report.context_chars,
            if report.context_truncated {
                " (truncated)"
            } else {
                ""
            }
        ));

        Self::push_artifact(&mut output, &report.dockerfile);
        if let Some(compose) = &report.compose {
            output.push('\n');
            Self::push_artifact(&mut output, compose);
        }

        output
    }

    fn push_artifact(output: &mut String, artifact: &ArtifactReport) {
        let status = match artifact.outcome {
            ArtifactOutcome::Valid => "valid",
            ArtifactOutcome::Invalid => "invalid",
            ArtifactOutcome::GenerationFailed => "not generated",
        };

        output.push_str(&format!("{}:\n", artifact.kind));
        output.push_str(&format!(
            "\u{251C}\u{2500} Path:     {}\n",
            artifact.path.display()
        ));
        output.push_str(&format!("\u{251C}\u{2500} Repaired: {}\n", artifact.repaired));

        let error = artifact.generation_error.as_deref().or_else(|| {
            artifact
                .validation
                .as_ref()
                .and_then(|v| v.error_text())
        });
        match error {
            Some(error) => {
                output.push_str(&format!("\u{251C}\u{2500} Status:   {}\n", status));
                output.push_str(&format!("\u{2514}\u{2500} Error:    {}\n", error.trim()));
            }
            None => output.push_str(&format!("\u{2514}\u{2500} Status:   {}\n", status)),
        }
    }
}
