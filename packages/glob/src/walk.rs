//! Pruned parallel directory traversal.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Component, Path, PathBuf};

use crate::error::GlobError;
use crate::pattern::PatternSet;

/// Dependency cache directories. Never matched by glob copies.
pub const DEPENDENCY_DIRS: &[&str] = &["node_modules"];

/// Directories skipped when searching a whole repository.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "target"];

/// Check whether any component of `path` is one of the excluded directory names.
#[must_use]
pub fn is_excluded(path: &Path, excluded_dirs: &[&str]) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => excluded_dirs.iter().any(|dir| name == *dir),
        _ => false,
    })
}

/// Find all files under `root` whose path relative to `root` matches `patterns`.
///
/// Directories named in `excluded_dirs` are pruned during traversal. Returned
/// paths are relative to `root` and sorted. A missing root yields no matches.
///
/// # Errors
///
/// Currently infallible for a valid [`PatternSet`]; entries that cannot be read
/// are skipped with a debug log.
pub fn find_matches(
    root: &Path,
    patterns: &PatternSet,
    excluded_dirs: &[&str],
) -> Result<Vec<PathBuf>, GlobError> {
    log::debug!(
        "Matching {:?} under {}",
        patterns.patterns(),
        root.display()
    );

    if !root.is_dir() || patterns.is_empty() {
        return Ok(Vec::new());
    }

    let pruned: Vec<String> = excluded_dirs.iter().map(|d| (*d).to_string()).collect();

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(false)
        .process_read_dir(move |_depth, _path, _state, children| {
            children.retain(|child| {
                child.as_ref().map_or(true, |entry| {
                    !(entry.file_type().is_dir()
                        && pruned.iter().any(|dir| entry.file_name() == dir.as_str()))
                })
            });
        });

    let mut matches: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.path();
            let rel_path = path.strip_prefix(root).ok()?.to_path_buf();
            patterns.is_match(&rel_path).then_some(rel_path)
        })
        .collect();

    matches.sort();
    log::debug!("Found {} matches", matches.len());

    Ok(matches)
}
