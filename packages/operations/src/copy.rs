//! Copy primitives: copy-if-absent, copy-always and template-if-absent.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

use worktree_setup_copy::{CopyError, CopyProgress, CopyResult};

use crate::OperationResult;
use crate::error::OperationError;

const fn to_operation_result(result: &CopyResult) -> OperationResult {
    match result {
        CopyResult::Created { .. } => OperationResult::Created,
        CopyResult::Exists => OperationResult::Exists,
        CopyResult::SourceNotFound => OperationResult::Skipped,
    }
}

/// Copy a file or directory unless something already exists at `target`.
///
/// # Errors
///
/// * If the copy fails
pub fn copy_if_absent(source: &Path, target: &Path) -> Result<OperationResult, OperationError> {
    copy_if_absent_with_progress(source, target, |_| {})
}

/// Like [`copy_if_absent`], reporting directory copy progress.
///
/// # Errors
///
/// * If the copy fails
pub fn copy_if_absent_with_progress<F>(
    source: &Path,
    target: &Path,
    on_progress: F,
) -> Result<OperationResult, OperationError>
where
    F: Fn(&CopyProgress) + Sync,
{
    let result = worktree_setup_copy::copy_if_absent(source, target, on_progress)?;
    Ok(to_operation_result(&result))
}

/// Copy a file or directory, replacing whatever is at `target`.
///
/// Reports `Created` whether or not something was replaced, and `Exists` when
/// `target` resolves onto `source` through a symlinked directory.
///
/// # Errors
///
/// * If the existing target cannot be removed
/// * If the copy fails
pub fn copy_always(source: &Path, target: &Path) -> Result<OperationResult, OperationError> {
    copy_always_with_progress(source, target, |_| {})
}

/// Like [`copy_always`], reporting directory copy progress.
///
/// # Errors
///
/// * If the existing target cannot be removed
/// * If the copy fails
pub fn copy_always_with_progress<F>(
    source: &Path,
    target: &Path,
    on_progress: F,
) -> Result<OperationResult, OperationError>
where
    F: Fn(&CopyProgress) + Sync,
{
    let result = worktree_setup_copy::copy_replacing(source, target, on_progress)?;
    Ok(to_operation_result(&result))
}

/// Instantiate a template: copy the bytes of one file unless `target` exists.
///
/// A directory source is never copied and reports `Skipped`.
///
/// # Errors
///
/// * If the copy fails
pub fn template_if_absent(source: &Path, target: &Path) -> Result<OperationResult, OperationError> {
    match worktree_setup_copy::copy_file_bytes(source, target) {
        Ok(result) => Ok(to_operation_result(&result)),
        Err(CopyError::NotAFile(path)) => {
            log::warn!("Template source is not a file: {}", path.display());
            Ok(OperationResult::Skipped)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_copy_if_absent_keeps_existing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("target.txt");
        fs::write(&source, "B").unwrap();
        fs::write(&target, "A").unwrap();

        assert_eq!(
            copy_if_absent(&source, &target).unwrap(),
            OperationResult::Exists
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), "A");
    }

    #[test]
    fn test_copy_always_replaces_and_reports_created() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("target.txt");
        fs::write(&source, "B").unwrap();
        fs::write(&target, "A").unwrap();

        assert_eq!(
            copy_always(&source, &target).unwrap(),
            OperationResult::Created
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), "B");
    }

    #[test]
    fn test_copy_always_source_missing() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target.txt");
        fs::write(&target, "A").unwrap();

        assert_eq!(
            copy_always(&dir.path().join("missing"), &target).unwrap(),
            OperationResult::Skipped
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), "A");
    }

    #[test]
    fn test_template_if_absent() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join(".env.example");
        let target = dir.path().join(".env");
        fs::write(&source, "PORT=3000").unwrap();

        assert_eq!(
            template_if_absent(&source, &target).unwrap(),
            OperationResult::Created
        );
        fs::write(&target, "PORT=4000").unwrap();
        assert_eq!(
            template_if_absent(&source, &target).unwrap(),
            OperationResult::Exists
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), "PORT=4000");
    }

    #[test]
    fn test_template_directory_source_is_skipped() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("templates");
        fs::create_dir_all(&source).unwrap();

        assert_eq!(
            template_if_absent(&source, &dir.path().join("out")).unwrap(),
            OperationResult::Skipped
        );
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_template_source_missing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            template_if_absent(&dir.path().join("missing"), &dir.path().join("out")).unwrap(),
            OperationResult::Skipped
        );
    }
}
