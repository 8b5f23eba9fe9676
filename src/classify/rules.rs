use super::files::{read_lowercase, read_prefix_lowercase, ProjectFiles};
use super::{Classification, Language};

/// How many leading characters of a Node entry file are searched for Express
const EXPRESS_SNIFF_CHARS: usize = 200;

/// One heuristic in the classification chain
///
/// Rules are evaluated in order and the first `Some` wins.
pub trait ClassificationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, files: &ProjectFiles) -> Option<Classification>;
}

/// Framework markers searched for in Python sources and manifests
const PYTHON_FRAMEWORKS: &[(&str, &[&str], &str)] = &[
    ("flask", &["from flask", "import flask"], "flask"),
    ("django", &["from django", "import django"], "django"),
];

/// `requirements.txt` naming flask or django
pub struct RequirementsFrameworkRule;

impl ClassificationRule for RequirementsFrameworkRule {
    fn name(&self) -> &'static str {
        "RequirementsFramework"
    }

    fn evaluate(&self, files: &ProjectFiles) -> Option<Classification> {
        let manifests: Vec<String> = files
            .named("requirements.txt")
            .filter_map(|p| read_lowercase(p))
            .collect();

        PYTHON_FRAMEWORKS
            .iter()
            .find(|(package, _, _)| manifests.iter().any(|m| m.contains(package)))
            .map(|(_, _, framework)| Classification::with_framework(Language::Python, *framework))
    }
}

/// `.py` sources importing flask or django
pub struct PythonImportRule;

impl ClassificationRule for PythonImportRule {
    fn name(&self) -> &'static str {
        "PythonImport"
    }

    fn evaluate(&self, files: &ProjectFiles) -> Option<Classification> {
        for path in files.with_extension("py") {
            let Some(source) = read_lowercase(path) else {
                continue;
            };

            for (_, markers, framework) in PYTHON_FRAMEWORKS {
                if markers.iter().any(|m| source.contains(m)) {
                    return Some(Classification::with_framework(Language::Python, *framework));
                }
            }
        }
        None
    }
}

/// Any Python manifest or source at all
pub struct PythonPresenceRule;

impl ClassificationRule for PythonPresenceRule {
    fn name(&self) -> &'static str {
        "PythonPresence"
    }

    fn evaluate(&self, files: &ProjectFiles) -> Option<Classification> {
        (files.has_named("requirements.txt") || files.has_extension("py"))
            .then(|| Classification::new(Language::Python))
    }
}

/// `package.json` or `.js` sources; Express when an entry file mentions it early
pub struct NodeRule;

impl ClassificationRule for NodeRule {
    fn name(&self) -> &'static str {
        "Node"
    }

    fn evaluate(&self, files: &ProjectFiles) -> Option<Classification> {
        if !files.has_named("package.json") && !files.has_extension("js") {
            return None;
        }

        let uses_express = ["server.js", "app.js"]
            .iter()
            .flat_map(|name| files.named(name))
            .filter_map(|p| read_prefix_lowercase(p, EXPRESS_SNIFF_CHARS))
            .any(|head| head.contains("express"));

        Some(if uses_express {
            Classification::with_framework(Language::Node, "express")
        } else {
            Classification::new(Language::Node)
        })
    }
}

/// Maven or Gradle builds
pub struct JavaRule;

impl ClassificationRule for JavaRule {
    fn name(&self) -> &'static str {
        "Java"
    }

    fn evaluate(&self, files: &ProjectFiles) -> Option<Classification> {
        (files.has_named("pom.xml") || files.has_extension("gradle"))
            .then(|| Classification::with_framework(Language::Java, "spring"))
    }
}

/// Classification by file extension alone
pub struct ExtensionRule {
    name: &'static str,
    extension: &'static str,
    language: Language,
}

impl ExtensionRule {
    pub const fn new(name: &'static str, extension: &'static str, language: Language) -> Self {
        Self {
            name,
            extension,
            language,
        }
    }

    pub const fn dotnet() -> Self {
        Self::new("Dotnet", "csproj", Language::Dotnet)
    }

    pub const fn cpp() -> Self {
        Self::new("Cpp", "cpp", Language::Cpp)
    }
}

impl ClassificationRule for ExtensionRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn evaluate(&self, files: &ProjectFiles) -> Option<Classification> {
        files
            .has_extension(self.extension)
            .then(|| Classification::new(self.language))
    }
}
