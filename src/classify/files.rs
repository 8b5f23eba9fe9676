//! File index shared by the classification rules

use crate::scan::{walk_files, ScanConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Every file under a project root, gathered by a single walk
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl ProjectFiles {
    /// Indexes `root`, pruning the default excluded directories
    pub fn collect(root: &Path) -> Self {
        Self::collect_excluding(root, &ScanConfig::default_excluded_dirs())
    }

    /// Indexes `root`, pruning directories named in `excluded_dirs`
    pub fn collect_excluding(root: &Path, excluded_dirs: &[String]) -> Self {
        Self {
            root: root.to_path_buf(),
            files: walk_files(root, excluded_dirs),
        }
    }

    pub fn from_paths(root: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files whose name equals `name` exactly
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PathBuf> + 'a {
        self.files
            .iter()
            .filter(move |p| p.file_name().and_then(|n| n.to_str()) == Some(name))
    }

    /// Files with extension `ext` (compared case-insensitively, without the dot)
    pub fn with_extension<'a>(&'a self, ext: &'a str) -> impl Iterator<Item = &'a PathBuf> + 'a {
        self.files.iter().filter(move |p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(ext))
                .unwrap_or(false)
        })
    }

    pub fn has_named(&self, name: &str) -> bool {
        self.named(name).next().is_some()
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        self.with_extension(ext).next().is_some()
    }
}

/// Reads a file as lowercased text
///
/// Strict UTF-8 is tried first, then lossy decoding. `None` means the file
/// could not be read at all; callers treat that as a non-match.
pub fn read_lowercase(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read file for classification");
            return None;
        }
    };

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), "File is not valid UTF-8, decoding leniently");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    Some(text.to_lowercase())
}

/// Like [`read_lowercase`] but keeps only the first `max_chars` characters
pub fn read_prefix_lowercase(path: &Path, max_chars: usize) -> Option<String> {
    read_lowercase(path).map(|text| text.chars().take(max_chars).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_named_and_extension_lookup() {
        let files = ProjectFiles::from_paths(
            "/repo",
            vec![
                PathBuf::from("/repo/requirements.txt"),
                PathBuf::from("/repo/api/app.py"),
                PathBuf::from("/repo/web/Site.CSPROJ"),
            ],
        );

        assert!(files.has_named("requirements.txt"));
        assert!(!files.has_named("package.json"));
        assert!(files.has_extension("py"));
        assert!(files.has_extension("csproj"));
        assert_eq!(files.with_extension("py").count(), 1);
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_collect_walks_nested_dirs() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/pom.xml"), "<project/>").unwrap();

        let files = ProjectFiles::collect(dir.path());

        assert!(files.has_named("pom.xml"));
        assert_eq!(files.root(), dir.path());
    }

    #[test]
    fn test_read_lowercase_lenient() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.py");
        fs::write(&path, b"From Flask import X\xff").unwrap();

        let text = read_lowercase(&path).unwrap();
        assert!(text.contains("from flask import x"));
    }

    #[test]
    fn test_read_missing_file_is_none() {
        assert!(read_lowercase(Path::new("/nonexistent/dockgen/app.py")).is_none());
    }

    #[test]
    fn test_read_prefix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.js");
        fs::write(&path, "ABCDEF").unwrap();

        assert_eq!(read_prefix_lowercase(&path, 3).unwrap(), "abc");
    }
}
