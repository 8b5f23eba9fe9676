//! Project scanning
//!
//! [`ProjectScanner`] walks a project tree and concatenates the contents of
//! recognized source and manifest files into a bounded [`ProjectContext`]
//! that is embedded verbatim into generation prompts.

use ignore::WalkBuilder;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default context cap, in characters
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 8000;

/// File extensions whose contents are included in the context
const RECOGNIZED_EXTENSIONS: &[&str] = &["py", "csproj"];

/// Exact file names whose contents are included in the context
const RECOGNIZED_FILENAMES: &[&str] = &[
    "requirements.txt",
    "package.json",
    "main.cpp",
    "index.js",
    "app.js",
    "pom.xml",
];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Project path does not exist: {0}")]
    PathNotFound(PathBuf),
    #[error("Project path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Cap on the serialized context, in characters
    pub max_context_chars: usize,
    /// Directory names that are never descended into
    pub excluded_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            excluded_dirs: Self::default_excluded_dirs(),
        }
    }
}

impl ScanConfig {
    pub fn with_max_chars(max_context_chars: usize) -> Self {
        Self {
            max_context_chars,
            ..Default::default()
        }
    }

    pub fn default_excluded_dirs() -> Vec<String> {
        [".git", "node_modules", "__pycache__", ".venv", "venv"]
            .iter()
            .map(|d| d.to_string())
            .collect()
    }
}

/// Returns true when a file with this name contributes to the context
pub fn is_recognized_file(file_name: &str) -> bool {
    if RECOGNIZED_FILENAMES.contains(&file_name) {
        return true;
    }

    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| RECOGNIZED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// One file included in the context
#[derive(Debug, Clone, Serialize)]
pub struct ScannedFile {
    pub file_name: String,
    /// Path relative to the scanned root
    pub relative_path: PathBuf,
    pub content: String,
}

/// Bounded text blob describing the project
///
/// Invariant: `as_str().chars().count() <= max_chars`. Truncation keeps a
/// prefix of the full concatenation, so later files may be cut mid-content.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    files: Vec<ScannedFile>,
    text: String,
    truncated: bool,
}

impl ProjectContext {
    pub fn from_files(files: Vec<ScannedFile>, max_chars: usize) -> Self {
        let full: String = files
            .iter()
            .map(|f| format!("\n\n# File: {}\n{}", f.file_name, f.content))
            .collect();

        let (text, truncated) = match full.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => (full[..byte_idx].to_string(), true),
            None => (full, false),
        };

        Self {
            files,
            text,
            truncated,
        }
    }

    pub fn files(&self) -> &[ScannedFile] {
        &self.files
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub struct ProjectScanner {
    config: ScanConfig,
}

impl ProjectScanner {
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scans `root` and builds the project context
    ///
    /// Unreadable files are logged and skipped; only an invalid root fails.
    pub fn scan(&self, root: &Path) -> Result<ProjectContext, ScanError> {
        ensure_directory(root)?;

        let start = Instant::now();
        info!(
            root = %root.display(),
            max_chars = self.config.max_context_chars,
            "Scanning project"
        );

        let mut files = Vec::new();
        for path in walk_files(root, &self.config.excluded_dirs) {
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            if !is_recognized_file(&file_name) {
                continue;
            }

            match std::fs::read(&path) {
                Ok(bytes) => {
                    let content = String::from_utf8_lossy(&bytes).into_owned();
                    debug!(path = %path.display(), bytes = bytes.len(), "Included file");
                    files.push(ScannedFile {
                        file_name,
                        relative_path: path.strip_prefix(root).unwrap_or(&path).to_path_buf(),
                        content,
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                }
            }
        }

        let context = ProjectContext::from_files(files, self.config.max_context_chars);

        debug!(
            files = context.files().len(),
            chars = context.len_chars(),
            truncated = context.is_truncated(),
            scan_time_ms = start.elapsed().as_millis() as u64,
            "Project scan complete"
        );

        Ok(context)
    }
}

impl Default for ProjectScanner {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn ensure_directory(root: &Path) -> Result<(), ScanError> {
    if !root.exists() {
        return Err(ScanError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Every regular file under `root`, in a stable (name-sorted) order
///
/// Hidden and git-ignored files are visited; only `excluded_dirs` are pruned.
pub(crate) fn walk_files(root: &Path, excluded_dirs: &[String]) -> Vec<PathBuf> {
    let excluded: Vec<String> = excluded_dirs.to_vec();

    let mut paths = Vec::new();
    for result in WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            !(is_dir
                && entry.depth() > 0
                && excluded
                    .iter()
                    .any(|d| entry.file_name().to_str() == Some(d.as_str())))
        })
        .build()
    {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Failed to read directory entry");
                continue;
            }
        };

        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            paths.push(entry.into_path());
        }
    }

    paths
}
