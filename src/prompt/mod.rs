//! Prompt construction for the model
//!
//! All builders are pure string assembly: identical inputs always produce
//! identical prompts.

use crate::classify::Classification;
use crate::scan::ProjectContext;
use serde::Serialize;
use std::fmt;

pub const DOCKERFILE_CUE: &str = "# Dockerfile:";
pub const COMPOSE_CUE: &str = "# docker-compose.yml:";
pub const REPAIR_CUE: &str = "# Corrected Dockerfile:";

/// What a model call is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationPurpose {
    Dockerfile,
    Compose,
    Repair,
}

impl fmt::Display for GenerationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationPurpose::Dockerfile => write!(f, "Dockerfile"),
            GenerationPurpose::Compose => write!(f, "docker-compose.yml"),
            GenerationPurpose::Repair => write!(f, "Dockerfile repair"),
        }
    }
}

fn target_line(classification: &Classification) -> String {
    match &classification.framework {
        Some(framework) => format!(
            "The project is a {} application using the {} framework.",
            classification.language, framework
        ),
        None => format!("The project is a {} application.", classification.language),
    }
}

pub struct PromptBuilder;

impl PromptBuilder {
    /// Prompt asking for a production-ready Dockerfile
    pub fn dockerfile(context: &str, classification: &Classification) -> String {
        format!(
            r#"
You are a professional DevOps engineer.

{target}

I will give you the contents of the project. Your task is to generate a working production-ready Dockerfile that can:

- Install necessary dependencies
- Install requirements.txt with pip if it exists, or run the package manager install (npm install, mvn package, dotnet restore) that the project needs
- Expose the right port
- Run the app correctly using CMD or ENTRYPOINT
- Ensure the app runs in a production environment
- Use the best practices for Dockerfile creation
- Use the provided context to understand the application structure and dependencies

Do not wrap the output in a fenced code block: no "```Dockerfile" at the start of the file and no "```" at the end.

ONLY return the Dockerfile. No explanations.

### Project code:
{context}

{cue}
"#,
            target = target_line(classification),
            context = context,
            cue = DOCKERFILE_CUE,
        )
    }

    /// Prompt asking for a docker-compose.yml
    pub fn compose(context: &str, classification: &Classification) -> String {
        format!(
            r#"
You are a professional DevOps engineer.

{target}

I will give you the contents of the project. Your task is to generate a working production-ready docker-compose.yml that:

- Defines an application service built from the Dockerfile in the project root
- Adds any auxiliary services the application depends on (for example a database or a cache) inferred from its code and dependencies
- Declares the ports the application listens on
- Declares volumes where data must persist
- Wires environment variables between the application and its auxiliary services

Do not wrap the output in a fenced code block: no "```yaml" at the start of the file and no "```" at the end.

ONLY return the docker-compose.yml. No explanations.

### Project code:
{context}

{cue}
"#,
            target = target_line(classification),
            context = context,
            cue = COMPOSE_CUE,
        )
    }

    /// Prompt asking the model to fix a Dockerfile that failed validation
    pub fn repair(broken: &str, error_text: Option<&str>) -> String {
        let error_section = match error_text.map(str::trim).filter(|e| !e.is_empty()) {
            Some(error) => format!("\nValidation reported this error:\n{}\n", error),
            None => String::new(),
        };

        format!(
            r#"
You are a professional DevOps engineer.

The following Dockerfile failed validation. It must contain a FROM instruction and a CMD instruction and must build successfully.

### Broken Dockerfile:
{broken}
{error_section}
Return only the corrected Dockerfile. No explanations. Do not wrap the output in a fenced code block.

{cue}
"#,
            broken = broken,
            error_section = error_section,
            cue = REPAIR_CUE,
        )
    }
}

/// Everything needed for one model call
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    pub context: &'a ProjectContext,
    pub classification: &'a Classification,
    pub purpose: GenerationPurpose,
    pub model: &'a str,
    pub prior_artifact: Option<&'a str>,
    pub prior_error: Option<&'a str>,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(
        context: &'a ProjectContext,
        classification: &'a Classification,
        purpose: GenerationPurpose,
        model: &'a str,
    ) -> Self {
        Self {
            context,
            classification,
            purpose,
            model,
            prior_artifact: None,
            prior_error: None,
        }
    }

    pub fn repair(
        context: &'a ProjectContext,
        classification: &'a Classification,
        model: &'a str,
        broken: &'a str,
        error_text: Option<&'a str>,
    ) -> Self {
        Self {
            prior_artifact: Some(broken),
            prior_error: error_text,
            ..Self::new(context, classification, GenerationPurpose::Repair, model)
        }
    }

    /// Renders the prompt text for this request
    pub fn prompt(&self) -> String {
        match self.purpose {
            GenerationPurpose::Dockerfile => {
                PromptBuilder::dockerfile(self.context.as_str(), self.classification)
            }
            GenerationPurpose::Compose => {
                PromptBuilder::compose(self.context.as_str(), self.classification)
            }
            GenerationPurpose::Repair => {
                PromptBuilder::repair(self.prior_artifact.unwrap_or_default(), self.prior_error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Language;
    use crate::scan::ScannedFile;
    use std::path::PathBuf;

    fn flask() -> Classification {
        Classification::with_framework(Language::Python, "flask")
    }

    #[test]
    fn test_dockerfile_prompt_mentions_target_and_context() {
        let prompt = PromptBuilder::dockerfile("# File: app.py\nfrom flask import Flask", &flask());

        assert!(prompt.contains("python"));
        assert!(prompt.contains("flask"));
        assert!(prompt.contains("# File: app.py\nfrom flask import Flask"));
        assert!(prompt.contains("requirements.txt"));
        assert!(prompt.contains("Expose the right port"));
        assert!(prompt.trim_end().ends_with(DOCKERFILE_CUE));
    }

    #[test]
    fn test_dockerfile_prompt_without_framework() {
        let prompt = PromptBuilder::dockerfile("", &Classification::new(Language::Cpp));
        assert!(prompt.contains("The project is a cpp application."));
        assert!(!prompt.contains("framework."));
    }

    #[test]
    fn test_compose_prompt_mentions_services() {
        let prompt = PromptBuilder::compose("ctx", &flask());

        assert!(prompt.contains("application service"));
        assert!(prompt.contains("database"));
        assert!(prompt.contains("volumes"));
        assert!(prompt.trim_end().ends_with(COMPOSE_CUE));
    }

    #[test]
    fn test_repair_prompt_embeds_artifact_and_error() {
        let prompt = PromptBuilder::repair("FROM python:3.11\nRUN pip install", Some("missing CMD"));

        assert!(prompt.contains("FROM python:3.11\nRUN pip install"));
        assert!(prompt.contains("missing CMD"));
        assert!(prompt.trim_end().ends_with(REPAIR_CUE));
    }

    #[test]
    fn test_repair_prompt_skips_blank_error() {
        let prompt = PromptBuilder::repair("FROM x", Some("  "));
        assert!(!prompt.contains("Validation reported"));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        assert_eq!(
            PromptBuilder::dockerfile("ctx", &flask()),
            PromptBuilder::dockerfile("ctx", &flask())
        );
    }

    #[test]
    fn test_request_renders_by_purpose() {
        let context = ProjectContext::from_files(
            vec![ScannedFile {
                file_name: "app.py".to_string(),
                relative_path: PathBuf::from("app.py"),
                content: "import flask".to_string(),
            }],
            8000,
        );
        let classification = flask();

        let request =
            GenerationRequest::new(&context, &classification, GenerationPurpose::Compose, "phi3");
        assert!(request.prompt().contains(COMPOSE_CUE));
        assert!(request.prompt().contains("import flask"));

        let repair =
            GenerationRequest::repair(&context, &classification, "phi3", "FROM broken", None);
        assert_eq!(repair.purpose, GenerationPurpose::Repair);
        assert!(repair.prompt().contains("FROM broken"));
    }
}
