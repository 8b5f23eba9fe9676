use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Output path {0} is a directory")]
    IsDirectory(PathBuf),
}

/// Writes `content` to `path`, replacing any existing file in one step
///
/// The bytes go to a temporary file in the destination directory which is
/// then renamed over `path`, so an interrupted run never leaves a truncated
/// artifact behind.
pub fn write_artifact(path: &Path, content: &str) -> Result<(), WriteError> {
    if path.is_dir() {
        return Err(WriteError::IsDirectory(path.to_path_buf()));
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    std::fs::create_dir_all(&parent).map_err(|source| WriteError::CreateDir {
        path: parent.clone(),
        source,
    })?;

    let write_err = |source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(&parent).map_err(write_err)?;
    temp.write_all(content.as_bytes()).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;

    debug!(path = %path.display(), bytes = content.len(), "Artifact written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_writes_exact_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.Dockerfile");
        let content = "FROM python:3.11\nCMD [\"python\",\"app.py\"]";

        write_artifact(&path, content).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Dockerfile");
        fs::write(&path, "a much longer previous artifact that must disappear").unwrap();

        write_artifact(&path, "FROM alpine").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "FROM alpine");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deploy/docker/Dockerfile");

        write_artifact(&path, "FROM alpine").unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn test_leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        write_artifact(&dir.path().join("Dockerfile"), "FROM alpine").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_directory_target_is_rejected() {
        let dir = TempDir::new().unwrap();

        let result = write_artifact(dir.path(), "FROM alpine");

        assert!(matches!(result, Err(WriteError::IsDirectory(_))));
    }
}
