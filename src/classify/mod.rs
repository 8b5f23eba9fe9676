//! Project classification
//!
//! Infers a `(language, framework)` pair for a project directory using an
//! ordered chain of [`ClassificationRule`]s. The first rule that matches
//! decides; when none do the project is [`Language::Generic`].
//!
//! New languages or frameworks are added by inserting a rule into the chain,
//! never by changing the evaluation loop.

mod files;
mod rules;

pub use files::{read_lowercase, ProjectFiles};
pub use rules::{
    ClassificationRule, ExtensionRule, JavaRule, NodeRule, PythonImportRule, PythonPresenceRule,
    RequirementsFrameworkRule,
};

use crate::scan::ScanConfig;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Node,
    Java,
    Dotnet,
    Cpp,
    Generic,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Node => "node",
            Language::Java => "java",
            Language::Dotnet => "dotnet",
            Language::Cpp => "cpp",
            Language::Generic => "generic",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inferred language and optional framework of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub language: Language,
    pub framework: Option<String>,
}

impl Classification {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            framework: None,
        }
    }

    pub fn with_framework(language: Language, framework: impl Into<String>) -> Self {
        Self {
            language,
            framework: Some(framework.into()),
        }
    }

    pub fn generic() -> Self {
        Self::new(Language::Generic)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.framework {
            Some(framework) => write!(f, "{}/{}", self.language, framework),
            None => write!(f, "{}", self.language),
        }
    }
}

pub struct ProjectClassifier {
    rules: Vec<Box<dyn ClassificationRule>>,
}

impl ProjectClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Box<dyn ClassificationRule>>) -> Self {
        Self { rules }
    }

    /// Classifies the project rooted at `root`
    ///
    /// Never fails: unreadable files simply do not match.
    pub fn classify(&self, root: &Path) -> Classification {
        self.classify_excluding(root, &ScanConfig::default_excluded_dirs())
    }

    /// Like [`classify`](Self::classify), skipping directories named in
    /// `excluded_dirs` so classification sees the same tree as the scanner
    pub fn classify_excluding(&self, root: &Path, excluded_dirs: &[String]) -> Classification {
        let files = ProjectFiles::collect_excluding(root, excluded_dirs);
        debug!(root = %root.display(), files = files.len(), "Collected files for classification");
        self.classify_files(&files)
    }

    pub fn classify_files(&self, files: &ProjectFiles) -> Classification {
        for rule in &self.rules {
            if let Some(classification) = rule.evaluate(files) {
                debug!(
                    rule = rule.name(),
                    language = %classification.language,
                    framework = classification.framework.as_deref().unwrap_or("none"),
                    "Project classified"
                );
                return classification;
            }
            debug!(rule = rule.name(), "Rule did not match");
        }

        debug!("No classification rule matched, using generic");
        Classification::generic()
    }
}

impl Default for ProjectClassifier {
    fn default() -> Self {
        Self {
            rules: vec![
                Box::new(RequirementsFrameworkRule),
                Box::new(PythonImportRule),
                Box::new(PythonPresenceRule),
                Box::new(NodeRule),
                Box::new(JavaRule),
                Box::new(ExtensionRule::dotnet()),
                Box::new(ExtensionRule::cpp()),
            ],
        }
    }
}
