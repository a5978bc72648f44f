//! Symlink operations.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::Path;

use crate::OperationResult;
use crate::error::OperationError;

/// Create a symlink at `target` pointing to `source`.
///
/// Checked in order:
///
/// 1. `target` is already a symlink (dangling or not): `Exists`
/// 2. `source` is missing: `Skipped`
///
/// Otherwise parent directories are created, any file or directory at
/// `target` is removed, and the symlink is created.
///
/// # Errors
///
/// * If an existing file/directory cannot be removed
/// * If the symlink cannot be created
pub fn create_symlink(source: &Path, target: &Path) -> Result<OperationResult, OperationError> {
    log::debug!(
        "Creating symlink: {} -> {}",
        target.display(),
        source.display()
    );

    if target.is_symlink() {
        log::debug!("Target is already a symlink");
        return Ok(OperationResult::Exists);
    }

    if !source.exists() {
        log::debug!("Source does not exist: {}", source.display());
        return Ok(OperationResult::Skipped);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| OperationError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    if let Ok(metadata) = fs::symlink_metadata(target) {
        log::debug!("Replacing existing path: {}", target.display());
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(target)
        } else {
            fs::remove_file(target)
        };
        removed.map_err(|e| OperationError::IoError {
            path: target.to_path_buf(),
            source: e,
        })?;
    }

    link(source, target).map_err(|e| OperationError::SymlinkError {
        original: source.to_path_buf(),
        link: target.to_path_buf(),
        error: e,
    })?;

    log::debug!("Created symlink successfully");
    Ok(OperationResult::Created)
}

#[cfg(unix)]
fn link(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(windows)]
fn link(source: &Path, target: &Path) -> std::io::Result<()> {
    if source.is_dir() {
        std::os::windows::fs::symlink_dir(source, target)
    } else {
        std::os::windows::fs::symlink_file(source, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_symlink_directory() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("main/data");
        let target = dir.path().join("wt/apps/web/data");

        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("big.bin"), "x").unwrap();

        let result = create_symlink(&source, &target).unwrap();
        assert_eq!(result, OperationResult::Created);
        assert!(target.is_symlink());
        assert_eq!(fs::read_link(&target).unwrap(), source);
        assert!(target.join("big.bin").exists());
    }

    #[test]
    fn test_create_symlink_twice_reports_exists() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");

        fs::write(&source, "content").unwrap();

        assert_eq!(
            create_symlink(&source, &target).unwrap(),
            OperationResult::Created
        );
        assert_eq!(
            create_symlink(&source, &target).unwrap(),
            OperationResult::Exists
        );
    }

    #[test]
    fn test_create_symlink_source_missing() {
        let dir = TempDir::new().unwrap();
        let result =
            create_symlink(&dir.path().join("nonexistent"), &dir.path().join("target")).unwrap();
        assert_eq!(result, OperationResult::Skipped);
        assert!(!dir.path().join("target").exists());
    }

    #[test]
    fn test_create_symlink_replaces_regular_directory() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");

        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale.txt"), "stale").unwrap();

        assert_eq!(
            create_symlink(&source, &target).unwrap(),
            OperationResult::Created
        );
        assert!(target.is_symlink());
        assert!(!target.join("stale.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_target_is_exists() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target");
        std::os::unix::fs::symlink(dir.path().join("gone"), &target).unwrap();

        let result = create_symlink(&dir.path().join("also-gone"), &target).unwrap();
        assert_eq!(result, OperationResult::Exists);
    }
}
