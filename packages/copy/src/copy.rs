//! Parallel file copying implementation.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::CopyError;
use crate::progress::{CopyProgress, ProgressTracker};

/// Result of a copy operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyResult {
    /// Files were copied successfully.
    Created {
        /// Number of files copied.
        files_copied: u64,
    },
    /// Target already exists, operation skipped.
    Exists,
    /// Source does not exist, operation skipped.
    SourceNotFound,
}

/// A file or symlink found while enumerating a source directory.
#[derive(Debug, Clone)]
struct FileEntry {
    source: PathBuf,
    target: PathBuf,
    is_symlink: bool,
}

/// Whether anything (including a dangling symlink) exists at `path`.
#[must_use]
pub fn path_present(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Copy a file or directory only if nothing exists at the target.
///
/// The target is checked first, then the source. Directories are copied
/// recursively and in parallel; parent directories of the target are created.
///
/// # Errors
///
/// * If a directory cannot be created or enumerated
/// * If any file copy fails (fail-fast for directories)
pub fn copy_if_absent<F>(
    source: &Path,
    target: &Path,
    on_progress: F,
) -> Result<CopyResult, CopyError>
where
    F: Fn(&CopyProgress) + Sync,
{
    log::debug!("Copying {} -> {}", source.display(), target.display());

    if path_present(target) {
        log::debug!("Target already exists");
        return Ok(CopyResult::Exists);
    }

    if !source.exists() {
        log::debug!("Source does not exist");
        return Ok(CopyResult::SourceNotFound);
    }

    copy_path(source, target, &on_progress)
}

/// Copy a file or directory, replacing anything already at the target.
///
/// A target that resolves onto the source through a symlinked parent is
/// reported as [`CopyResult::Exists`] and nothing is removed.
///
/// # Errors
///
/// * If the existing target cannot be removed
/// * If the copy fails
pub fn copy_replacing<F>(
    source: &Path,
    target: &Path,
    on_progress: F,
) -> Result<CopyResult, CopyError>
where
    F: Fn(&CopyProgress) + Sync,
{
    log::debug!(
        "Overwriting {} -> {}",
        source.display(),
        target.display()
    );

    if !source.exists() {
        log::debug!("Source does not exist");
        return Ok(CopyResult::SourceNotFound);
    }

    if target_aliases_source(source, target) {
        log::debug!("Target resolves into the source, leaving it in place");
        return Ok(CopyResult::Exists);
    }

    remove_existing(target)?;
    copy_path(source, target, &on_progress)
}

/// Whether `target` lands on `source` or on a directory containing it once
/// symlinks in its parent are followed. Removing such a target would delete
/// the source.
fn target_aliases_source(source: &Path, target: &Path) -> bool {
    let (Some(parent), Some(name)) = (target.parent(), target.file_name()) else {
        return false;
    };
    let (Ok(source), Ok(parent)) = (source.canonicalize(), parent.canonicalize()) else {
        return false;
    };

    let resolved = parent.join(name);
    resolved.starts_with(&source) || source.starts_with(&resolved)
}

/// Copy the bytes of a single regular file only if nothing exists at the target.
///
/// # Errors
///
/// * [`CopyError::NotAFile`] if the source exists but is not a regular file
/// * If the copy fails
pub fn copy_file_bytes(source: &Path, target: &Path) -> Result<CopyResult, CopyError> {
    log::debug!(
        "Copying file contents {} -> {}",
        source.display(),
        target.display()
    );

    if path_present(target) {
        log::debug!("Target already exists");
        return Ok(CopyResult::Exists);
    }

    if !source.exists() {
        log::debug!("Source does not exist");
        return Ok(CopyResult::SourceNotFound);
    }

    if !source.is_file() {
        return Err(CopyError::NotAFile(source.to_path_buf()));
    }

    create_parent(target)?;
    copy_file_with_reflink(source, target)?;

    Ok(CopyResult::Created { files_copied: 1 })
}

fn copy_path<F>(source: &Path, target: &Path, on_progress: &F) -> Result<CopyResult, CopyError>
where
    F: Fn(&CopyProgress) + Sync,
{
    if source.is_dir() {
        return copy_directory(source, target, on_progress);
    }

    on_progress(&CopyProgress::new(
        1,
        0,
        Some(source.to_string_lossy().to_string()),
    ));

    create_parent(target)?;
    copy_file_with_reflink(source, target)?;

    on_progress(&CopyProgress::new(
        1,
        1,
        Some(source.to_string_lossy().to_string()),
    ));

    Ok(CopyResult::Created { files_copied: 1 })
}

/// Copy a directory tree: enumerate with jwalk, then copy files with rayon.
fn copy_directory<F>(source: &Path, target: &Path, on_progress: &F) -> Result<CopyResult, CopyError>
where
    F: Fn(&CopyProgress) + Sync,
{
    let entries = enumerate_directory(source, target)?;
    let total_files = entries.len() as u64;

    log::debug!("Found {total_files} files to copy");

    fs::create_dir_all(target).map_err(|e| CopyError::CreateDirError {
        path: target.to_path_buf(),
        io_error: e,
    })?;

    if total_files == 0 {
        return Ok(CopyResult::Created { files_copied: 0 });
    }

    let tracker = ProgressTracker::new();
    tracker.set_total(total_files);
    on_progress(&tracker.snapshot(None));

    let dirs: BTreeSet<&Path> = entries
        .iter()
        .filter_map(|entry| entry.target.parent())
        .collect();
    for dir in dirs {
        fs::create_dir_all(dir).map_err(|e| CopyError::CreateDirError {
            path: dir.to_path_buf(),
            io_error: e,
        })?;
    }

    entries
        .par_iter()
        .try_for_each(|entry| -> Result<(), CopyError> {
            if entry.is_symlink {
                copy_symlink(&entry.source, &entry.target)?;
            } else {
                copy_file_with_reflink(&entry.source, &entry.target)?;
            }

            // Throttled: reporting every file costs more than the copy for small files.
            let copied = tracker.increment_copied();
            if copied % 100 == 0 || copied == total_files {
                on_progress(&tracker.snapshot(Some(entry.source.to_string_lossy().to_string())));
            }

            Ok(())
        })?;

    on_progress(&tracker.snapshot(None));

    Ok(CopyResult::Created {
        files_copied: total_files,
    })
}

/// Enumerate all files and symlinks below `source`, paired with their targets.
///
/// Empty subdirectories are recreated here since they have no file entries.
fn enumerate_directory(source: &Path, target: &Path) -> Result<Vec<FileEntry>, CopyError> {
    let mut entries = Vec::new();

    for entry in jwalk::WalkDir::new(source)
        .skip_hidden(false)
        .follow_links(false)
    {
        let entry = entry.map_err(|e| CopyError::EnumerationError {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;

        let source_path = entry.path();
        if source_path == source {
            continue;
        }

        let rel_path =
            source_path
                .strip_prefix(source)
                .map_err(|_| CopyError::EnumerationError {
                    path: source_path.clone(),
                    message: "entry outside of source directory".to_string(),
                })?;
        let target_path = target.join(rel_path);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target_path).map_err(|e| CopyError::CreateDirError {
                path: target_path.clone(),
                io_error: e,
            })?;
            continue;
        }

        entries.push(FileEntry {
            source: source_path.clone(),
            target: target_path,
            is_symlink: file_type.is_symlink(),
        });
    }

    Ok(entries)
}

fn create_parent(target: &Path) -> Result<(), CopyError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| CopyError::CreateDirError {
            path: parent.to_path_buf(),
            io_error: e,
        })?;
    }
    Ok(())
}

/// Remove whatever is at `path`. Symlinks are removed, never followed.
fn remove_existing(path: &Path) -> Result<(), CopyError> {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return Ok(());
    };

    log::debug!("Removing existing path: {}", path.display());

    let result = if metadata.file_type().is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    result.map_err(|e| CopyError::RemoveError {
        path: path.to_path_buf(),
        io_error: e,
    })
}

/// Copy one file, reflinking when the filesystem supports it.
fn copy_file_with_reflink(source: &Path, target: &Path) -> Result<(), CopyError> {
    match reflink_copy::reflink_or_copy(source, target) {
        Ok(None) => log::trace!("Reflinked {} -> {}", source.display(), target.display()),
        Ok(Some(bytes)) => log::trace!(
            "Copied {bytes} bytes {} -> {}",
            source.display(),
            target.display()
        ),
        Err(e) => {
            return Err(CopyError::FileCopyError {
                source_path: source.to_path_buf(),
                target_path: target.to_path_buf(),
                io_error: e,
            });
        }
    }
    Ok(())
}

/// Copy a symlink, preserving it as a symlink.
fn copy_symlink(source: &Path, target: &Path) -> Result<(), CopyError> {
    let link_target = fs::read_link(source).map_err(|e| CopyError::ReadLinkError {
        path: source.to_path_buf(),
        io_error: e,
    })?;

    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(&link_target, target);

    #[cfg(windows)]
    let result = {
        let resolved = source.parent().map_or(link_target.clone(), |p| p.join(&link_target));
        if resolved.is_dir() {
            std::os::windows::fs::symlink_dir(&link_target, target)
        } else {
            std::os::windows::fs::symlink_file(&link_target, target)
        }
    };

    result.map_err(|e| CopyError::CreateSymlinkError {
        path: target.to_path_buf(),
        io_error: e,
    })?;

    log::trace!(
        "Symlinked {} -> {} (target: {})",
        source.display(),
        target.display(),
        link_target.display()
    );

    Ok(())
}
