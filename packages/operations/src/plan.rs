//! Operation planning - enumerate operations with file counts without executing.
//!
//! Every declared entry is resolved here, so a config with an entry that cannot
//! be mapped onto both worktrees is rejected before anything is written.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use worktree_setup_config::LoadedConfig;
use worktree_setup_copy::{count_files_with_progress, path_present};
use worktree_setup_glob::{PatternSet, find_matches};

use crate::ApplyConfigOptions;
use crate::error::OperationError;
use crate::resolve::{config_relative_dir, display_path, mirror_path, resolve_relative};

/// Directory name of the dependency cache copied by the bulk step.
pub const NODE_MODULES_DIR: &str = "node_modules";

/// Directories never descended into when expanding `copyGlob` patterns.
const GLOB_EXCLUDED_DIRS: &[&str] = &[NODE_MODULES_DIR, ".git"];

/// Type of operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Create a symlink.
    Symlink,
    /// Copy file/directory (skip if exists).
    Copy,
    /// Copy file/directory, replacing the target.
    Overwrite,
    /// Copy one glob match (skip if exists).
    CopyGlob,
    /// Bulk copy of the config's `node_modules` directory (skip if exists).
    NodeModules,
    /// Instantiate a template file (skip if exists).
    Template,
    /// Copy an unstaged/untracked file, replacing the target.
    Unstaged,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symlink => write!(f, "symlink"),
            Self::Copy | Self::CopyGlob | Self::NodeModules => write!(f, "copy"),
            Self::Overwrite => write!(f, "overwrite"),
            Self::Template => write!(f, "template"),
            Self::Unstaged => write!(f, "unstaged"),
        }
    }
}

/// A planned operation with metadata for progress display.
#[derive(Debug, Clone)]
pub struct PlannedOperation {
    /// Target path relative to the worktree root.
    pub display_path: String,
    /// Source path relative to the worktree root. Differs from
    /// `display_path` only for templates.
    pub source_display: String,
    /// Type of operation.
    pub operation_type: OperationType,
    /// Source path (absolute).
    pub source: PathBuf,
    /// Target path (absolute).
    pub target: PathBuf,
    /// Number of files (1 for single files, N for directories).
    pub file_count: u64,
    /// Whether this is a directory operation.
    pub is_directory: bool,
    /// Whether the operation is expected to be a no-op, as of planning time.
    pub will_skip: bool,
    /// Reason for skipping (if applicable).
    pub skip_reason: Option<String>,
}

impl PlannedOperation {
    /// Label shown in progress output.
    #[must_use]
    pub fn label(&self) -> String {
        if self.operation_type == OperationType::Template {
            format!("{} -> {}", self.source_display, self.display_path)
        } else {
            self.display_path.clone()
        }
    }
}

/// Resolves entries of one config against a pair of worktrees.
struct Planner<'a> {
    source_root: &'a Path,
    target_root: &'a Path,
    config_dir: PathBuf,
}

impl Planner<'_> {
    fn resolve(&self, entry: &str) -> Result<PathBuf, OperationError> {
        resolve_relative(&self.config_dir, entry)
    }

    /// Entries that would replace the whole worktree are rejected.
    fn resolve_replacing(&self, entry: &str) -> Result<PathBuf, OperationError> {
        let relative = self.resolve(entry)?;
        if relative.as_os_str().is_empty() {
            return Err(OperationError::PathResolutionAmbiguous {
                entry: entry.to_string(),
                reason: "would replace the worktree root".to_string(),
            });
        }
        Ok(relative)
    }

    fn operation(&self, operation_type: OperationType, relative: &Path) -> PlannedOperation {
        let display = display_path(relative);
        PlannedOperation {
            source_display: display.clone(),
            display_path: display,
            operation_type,
            source: mirror_path(self.source_root, relative),
            target: mirror_path(self.target_root, relative),
            file_count: 0,
            is_directory: false,
            will_skip: false,
            skip_reason: None,
        }
    }
}

/// Split a `copyGlob` pattern into the literal directory it searches from and
/// the glob matched below that directory.
///
/// The directory part keeps a leading `/` and its trailing separator, so it can
/// be resolved like any other entry. `../shared/*.env` splits into `../shared/`
/// and `*.env`. Excluded directories stay in the glob so they are never walked.
fn split_glob_base(pattern: &str) -> (&str, &str) {
    let mut split = usize::from(pattern.starts_with('/'));
    let mut rest = &pattern[split..];

    while let Some((segment, tail)) = rest.split_once('/') {
        if tail.is_empty()
            || segment.contains(['*', '?', '[', ']', '{', '}', '\\'])
            || GLOB_EXCLUDED_DIRS.contains(&segment)
        {
            break;
        }
        split += segment.len() + 1;
        rest = tail;
    }

    (&pattern[..split], rest)
}

/// Fill in the planning-time preview for an operation: skip state and file count.
fn preview<F>(op: &mut PlannedOperation, on_count: F)
where
    F: Fn(u64),
{
    let skip = |op: &mut PlannedOperation, reason: &str| {
        op.will_skip = true;
        op.skip_reason = Some(reason.to_string());
    };

    match op.operation_type {
        OperationType::Symlink => {
            if op.target.is_symlink() {
                skip(op, "exists");
            } else if !op.source.exists() {
                skip(op, "not found");
            }
            return;
        }
        OperationType::Overwrite | OperationType::Unstaged => {
            if !op.source.exists() {
                skip(op, "not found");
                return;
            }
        }
        OperationType::Copy | OperationType::CopyGlob | OperationType::NodeModules => {
            if path_present(&op.target) {
                skip(op, "exists");
                return;
            } else if !op.source.exists() {
                skip(op, "not found");
                return;
            }
        }
        OperationType::Template => {
            if path_present(&op.target) {
                skip(op, "exists");
            } else if !op.source.exists() {
                skip(op, "not found");
            } else if !op.source.is_file() {
                skip(op, "not a file");
            } else {
                op.file_count = 1;
            }
            return;
        }
    }

    op.is_directory = op.source.is_dir();
    op.file_count = if op.is_directory {
        count_files_with_progress(&op.source, on_count)
    } else {
        1
    };
}

/// Whether the config names its `node_modules` directory explicitly.
fn names_node_modules(
    planner: &Planner<'_>,
    config: &LoadedConfig,
    node_modules: &Path,
) -> bool {
    let cfg = &config.config;
    cfg.symlinks
        .iter()
        .chain(&cfg.copy)
        .chain(&cfg.overwrite)
        .any(|entry| {
            planner
                .resolve(entry)
                .is_ok_and(|relative| relative == node_modules)
        })
}

/// Plan all operations for a config without executing.
///
/// Operations are returned in execution order: symlinks, copies, overwrites,
/// the `node_modules` bulk copy, glob matches, templates.
///
/// # Errors
///
/// * [`OperationError::PathResolutionAmbiguous`] if an entry resolves outside
///   the repository, or a symlink/overwrite entry resolves to the root itself
pub fn plan_operations(
    config: &LoadedConfig,
    source_root: &Path,
    target_root: &Path,
    options: &ApplyConfigOptions,
) -> Result<Vec<PlannedOperation>, OperationError> {
    plan_operations_with_progress(config, source_root, target_root, options, &|_, _, _, _| {})
}

/// Plan all operations for a config with progress reporting.
///
/// The progress callback receives:
/// - `current_op`: Current entry index (1-based)
/// - `total_ops`: Total number of entries to scan
/// - `path`: Path being scanned
/// - `file_count`: Current file count (Some during directory scan, None for quick checks)
///
/// # Errors
///
/// * [`OperationError::PathResolutionAmbiguous`] if an entry resolves outside
///   the repository, or a symlink/overwrite entry resolves to the root itself
pub fn plan_operations_with_progress<F>(
    config: &LoadedConfig,
    source_root: &Path,
    target_root: &Path,
    options: &ApplyConfigOptions,
    on_progress: &F,
) -> Result<Vec<PlannedOperation>, OperationError>
where
    F: Fn(usize, usize, &str, Option<u64>),
{
    let cfg = &config.config;
    let planner = Planner {
        source_root,
        target_root,
        config_dir: config_relative_dir(&config.config_dir, &config.relative_path, source_root),
    };

    log::debug!(
        "Planning {} (config dir `{}`)",
        config.relative_path,
        planner.config_dir.display()
    );

    // Resolve everything up front so nothing is scanned for a rejected config.
    let mut explicit = Vec::new();
    for entry in &cfg.symlinks {
        explicit.push(planner.operation(OperationType::Symlink, &planner.resolve_replacing(entry)?));
    }
    for entry in &cfg.copy {
        explicit.push(planner.operation(OperationType::Copy, &planner.resolve(entry)?));
    }
    for entry in &cfg.overwrite {
        explicit.push(planner.operation(OperationType::Overwrite, &planner.resolve_replacing(entry)?));
    }

    let mut globs = Vec::with_capacity(cfg.copy_glob.len());
    for pattern in &cfg.copy_glob {
        let (base, glob) = split_glob_base(pattern);
        let search_rel =
            planner
                .resolve(base)
                .map_err(|_| OperationError::PathResolutionAmbiguous {
                    entry: pattern.clone(),
                    reason: "searches outside the repository root".to_string(),
                })?;
        globs.push((pattern, search_rel, glob));
    }

    let mut templates = Vec::new();
    for template in &cfg.templates {
        let source = planner.resolve(&template.source)?;
        let target = planner.resolve(&template.target)?;
        let mut op = planner.operation(OperationType::Template, &target);
        op.source = mirror_path(source_root, &source);
        op.source_display = display_path(&source);
        templates.push(op);
    }

    let node_modules_rel = planner.config_dir.join(NODE_MODULES_DIR);
    let node_modules = options
        .copy_node_modules
        .unwrap_or_else(|| cfg.should_copy_node_modules())
        && mirror_path(source_root, &node_modules_rel).is_dir()
        && !names_node_modules(&planner, config, &node_modules_rel);

    let total_ops =
        explicit.len() + usize::from(node_modules) + cfg.copy_glob.len() + templates.len();
    let mut current_op = 0usize;
    let mut operations = Vec::with_capacity(total_ops);

    for mut op in explicit {
        current_op += 1;
        let label = op.display_path.clone();
        on_progress(current_op, total_ops, &label, None);
        preview(&mut op, |n| on_progress(current_op, total_ops, &label, Some(n)));
        operations.push(op);
    }

    if node_modules {
        current_op += 1;
        let mut op = planner.operation(OperationType::NodeModules, &node_modules_rel);
        let label = op.display_path.clone();
        on_progress(current_op, total_ops, &label, None);
        preview(&mut op, |n| on_progress(current_op, total_ops, &label, Some(n)));
        operations.push(op);
    }

    // Each pattern counts as one entry for progress, however many files it matches.
    for (pattern, search_rel, glob) in globs {
        current_op += 1;
        on_progress(current_op, total_ops, pattern, None);

        let patterns = match PatternSet::new(&[glob]) {
            Ok(patterns) => patterns,
            Err(e) => {
                log::warn!("Ignoring copyGlob pattern in {}: {e}", config.relative_path);
                continue;
            }
        };

        let matches = find_matches(
            &mirror_path(source_root, &search_rel),
            &patterns,
            GLOB_EXCLUDED_DIRS,
        )?;
        log::debug!("Pattern `{pattern}` matched {} files", matches.len());

        for rel_path in matches {
            let mut op = planner.operation(OperationType::CopyGlob, &search_rel.join(rel_path));
            preview(&mut op, |_| {});
            operations.push(op);
        }
    }

    for mut op in templates {
        current_op += 1;
        on_progress(current_op, total_ops, &op.label(), None);
        preview(&mut op, |_| {});
        operations.push(op);
    }

    Ok(operations)
}

/// Plan copies of unstaged/untracked files.
///
/// Separate from [`plan_operations`] since the file list comes from git once
/// per run rather than from a config. Files that no longer exist in the source
/// are left out.
#[must_use]
pub fn plan_unstaged_operations(
    unstaged_files: &[String],
    source_root: &Path,
    target_root: &Path,
) -> Vec<PlannedOperation> {
    unstaged_files
        .iter()
        .filter_map(|file| {
            let source = source_root.join(file);
            if !source.is_file() {
                log::debug!("Unstaged file no longer present: {file}");
                return None;
            }
            Some(PlannedOperation {
                display_path: file.clone(),
                source_display: file.clone(),
                operation_type: OperationType::Unstaged,
                source,
                target: target_root.join(file),
                file_count: 1,
                is_directory: false,
                will_skip: false,
                skip_reason: None,
            })
        })
        .collect()
}
