//! Configuration application.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

use worktree_setup_config::LoadedConfig;
use worktree_setup_copy::CopyProgress;
use worktree_setup_git::{get_unstaged_and_untracked_files, open_repo};

use crate::OperationResult;
use crate::copy::{copy_always_with_progress, copy_if_absent_with_progress, template_if_absent};
use crate::error::OperationError;
use crate::plan::{OperationType, PlannedOperation, plan_operations, plan_unstaged_operations};
use crate::symlink::create_symlink;

/// Options for applying a configuration.
#[derive(Debug, Clone, Default)]
pub struct ApplyConfigOptions {
    /// Override the config's `copyNodeModules` setting.
    pub copy_node_modules: Option<bool>,
}

/// Outcome of running one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    /// Result of the operation.
    pub result: OperationResult,
    /// Why the operation failed, when an error was degraded to `Skipped`.
    pub message: Option<String>,
}

impl From<OperationResult> for OperationOutcome {
    fn from(result: OperationResult) -> Self {
        Self {
            result,
            message: None,
        }
    }
}

/// Record of a single file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    /// Path relative to the worktree root.
    pub path: String,
    /// Result of the operation.
    pub result: OperationResult,
    /// Error detail for a degraded operation.
    pub message: Option<String>,
}

/// Record of a template instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    /// Template path relative to the worktree root.
    pub source: String,
    /// Instantiated path relative to the worktree root.
    pub target: String,
    /// Result of the operation.
    pub result: OperationResult,
    /// Error detail for a degraded operation.
    pub message: Option<String>,
}

/// Result of applying one configuration.
///
/// Each list keeps declaration order. Overwrites, glob matches and the
/// `node_modules` bulk copy are reported under `copies`.
#[derive(Debug, Clone)]
pub struct ConfigApplyResult {
    /// The config that was applied.
    pub config: LoadedConfig,
    /// Symlink operations performed.
    pub symlinks: Vec<OperationRecord>,
    /// Copy operations performed.
    pub copies: Vec<OperationRecord>,
    /// Template operations performed.
    pub templates: Vec<TemplateRecord>,
}

impl ConfigApplyResult {
    /// Empty result for `config`.
    #[must_use]
    pub const fn new(config: LoadedConfig) -> Self {
        Self {
            config,
            symlinks: Vec::new(),
            copies: Vec::new(),
            templates: Vec::new(),
        }
    }

    /// Append the outcome of a planned operation to its category.
    pub fn record(&mut self, op: &PlannedOperation, outcome: OperationOutcome) {
        match op.operation_type {
            OperationType::Template => self.templates.push(TemplateRecord {
                source: op.source_display.clone(),
                target: op.display_path.clone(),
                result: outcome.result,
                message: outcome.message,
            }),
            OperationType::Symlink => self.symlinks.push(operation_record(op, outcome)),
            OperationType::Copy
            | OperationType::Overwrite
            | OperationType::CopyGlob
            | OperationType::NodeModules
            | OperationType::Unstaged => self.copies.push(operation_record(op, outcome)),
        }
    }

    /// Number of operations across all categories with the given result.
    #[must_use]
    pub fn count(&self, result: OperationResult) -> usize {
        self.symlinks
            .iter()
            .chain(&self.copies)
            .filter(|r| r.result == result)
            .count()
            + self.templates.iter().filter(|r| r.result == result).count()
    }
}

fn operation_record(op: &PlannedOperation, outcome: OperationOutcome) -> OperationRecord {
    OperationRecord {
        path: op.display_path.clone(),
        result: outcome.result,
        message: outcome.message,
    }
}

/// Apply a loaded configuration to a target worktree.
///
/// All entries are resolved before anything is written. Individual operations
/// never fail the call: I/O errors are logged and reported as `Skipped`.
///
/// # Errors
///
/// * [`OperationError::PathResolutionAmbiguous`] if an entry cannot be resolved;
///   nothing has been written in that case
pub fn apply_config(
    config: &LoadedConfig,
    source_root: &Path,
    target_root: &Path,
    options: &ApplyConfigOptions,
) -> Result<ConfigApplyResult, OperationError> {
    log::info!(
        "Applying config {} to {}",
        config.relative_path,
        target_root.display()
    );

    let operations = plan_operations(config, source_root, target_root, options)?;

    let mut result = ConfigApplyResult::new(config.clone());
    for op in &operations {
        let outcome = run_operation(op, |_, _| {});
        result.record(op, outcome);
    }

    Ok(result)
}

/// Execute a single planned operation with progress callback.
///
/// The filesystem is checked again here, so an operation planned before an
/// earlier config ran still reports the right result. For directory copies the
/// callback receives `(files_completed, files_total)`.
///
/// # Errors
///
/// * If the operation fails
pub fn execute_operation<F>(
    op: &PlannedOperation,
    on_progress: F,
) -> Result<OperationResult, OperationError>
where
    F: Fn(u64, u64) + Sync,
{
    let report = |progress: &CopyProgress| on_progress(progress.files_copied, progress.files_total);

    match op.operation_type {
        OperationType::Symlink => create_symlink(&op.source, &op.target),
        OperationType::Copy | OperationType::CopyGlob | OperationType::NodeModules => {
            copy_if_absent_with_progress(&op.source, &op.target, report)
        }
        OperationType::Overwrite | OperationType::Unstaged => {
            copy_always_with_progress(&op.source, &op.target, report)
        }
        OperationType::Template => template_if_absent(&op.source, &op.target),
    }
}

/// Execute a planned operation, degrading any error to `Skipped`.
#[must_use]
pub fn run_operation<F>(op: &PlannedOperation, on_progress: F) -> OperationOutcome
where
    F: Fn(u64, u64) + Sync,
{
    match execute_operation(op, on_progress) {
        Ok(result) => result.into(),
        Err(e) => {
            log::warn!("{} {} failed: {e}", op.operation_type, op.label());
            OperationOutcome {
                result: OperationResult::Skipped,
                message: Some(e.to_string()),
            }
        }
    }
}

/// Whether unstaged/untracked files should be copied for this selection.
///
/// `override_setting` (from the command line) wins; otherwise any selected
/// config asking for it is enough.
#[must_use]
pub fn should_copy_unstaged(configs: &[LoadedConfig], override_setting: Option<bool>) -> bool {
    override_setting.unwrap_or_else(|| configs.iter().any(|c| c.config.copy_unstaged))
}

/// List files with uncommitted changes in the source worktree.
///
/// # Errors
///
/// * If the repository cannot be opened or its status read
pub fn list_unstaged_files(source_root: &Path) -> Result<Vec<String>, OperationError> {
    let repo = open_repo(source_root)?;
    Ok(get_unstaged_and_untracked_files(&repo)?)
}

/// Copy unstaged/untracked files into the target, replacing what is there.
#[must_use]
pub fn apply_unstaged(
    files: &[String],
    source_root: &Path,
    target_root: &Path,
) -> Vec<OperationRecord> {
    log::info!("Copying {} unstaged and untracked files", files.len());

    plan_unstaged_operations(files, source_root, target_root)
        .iter()
        .map(|op| operation_record(op, run_operation(op, |_, _| {})))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use tempfile::TempDir;
    use worktree_setup_config::{Config, TemplateMapping};

    fn create_test_config(dir: &Path) -> LoadedConfig {
        LoadedConfig {
            config: Config {
                description: "Test".to_string(),
                symlinks: vec!["data".to_string()],
                copy: vec!["config.json".to_string()],
                overwrite: vec!["settings.json".to_string()],
                templates: vec![TemplateMapping {
                    source: ".env.example".to_string(),
                    target: ".env".to_string(),
                }],
                ..Default::default()
            },
            config_path: dir.join("worktree.config.toml"),
            config_dir: dir.to_path_buf(),
            relative_path: "worktree.config.toml".to_string(),
            variant_name: None,
        }
    }

    #[test]
    fn test_apply_config_categories() {
        let main_dir = TempDir::new().unwrap();
        let target_dir = TempDir::new().unwrap();

        fs::create_dir_all(main_dir.path().join("data")).unwrap();
        fs::write(main_dir.path().join("data/file.txt"), "content").unwrap();
        fs::write(main_dir.path().join("config.json"), "{}").unwrap();
        fs::write(main_dir.path().join(".env.example"), "PORT=1").unwrap();

        let config = create_test_config(main_dir.path());
        let result = apply_config(
            &config,
            main_dir.path(),
            target_dir.path(),
            &ApplyConfigOptions::default(),
        )
        .unwrap();

        assert_eq!(result.symlinks.len(), 1);
        assert_eq!(result.symlinks[0].result, OperationResult::Created);
        assert!(target_dir.path().join("data").is_symlink());

        assert_eq!(result.copies.len(), 2);
        assert_eq!(result.copies[0].path, "config.json");
        assert_eq!(result.copies[0].result, OperationResult::Created);
        assert_eq!(result.copies[1].path, "settings.json");
        assert_eq!(result.copies[1].result, OperationResult::Skipped);

        assert_eq!(result.templates.len(), 1);
        assert_eq!(result.templates[0].source, ".env.example");
        assert_eq!(result.templates[0].target, ".env");
        assert_eq!(result.templates[0].result, OperationResult::Created);
        assert_eq!(
            fs::read_to_string(target_dir.path().join(".env")).unwrap(),
            "PORT=1"
        );

        assert_eq!(result.count(OperationResult::Created), 3);
        assert_eq!(result.count(OperationResult::Skipped), 1);
    }

    #[test]
    fn test_io_error_degrades_to_skipped() {
        let main_dir = TempDir::new().unwrap();
        let target_dir = TempDir::new().unwrap();
        // A regular file where a parent directory is needed.
        fs::write(target_dir.path().join("nested"), "file").unwrap();

        let config = LoadedConfig {
            config: Config {
                description: "Test".to_string(),
                copy: vec!["config.json".to_string()],
                ..Default::default()
            },
            config_path: main_dir.path().join("nested/worktree.config.toml"),
            config_dir: main_dir.path().join("nested"),
            relative_path: "nested/worktree.config.toml".to_string(),
            variant_name: None,
        };
        fs::create_dir_all(main_dir.path().join("nested")).unwrap();
        fs::write(main_dir.path().join("nested/config.json"), "{}").unwrap();

        let result = apply_config(
            &config,
            main_dir.path(),
            target_dir.path(),
            &ApplyConfigOptions::default(),
        )
        .unwrap();

        assert_eq!(result.copies[0].result, OperationResult::Skipped);
        assert!(result.copies[0].message.is_some());
    }

    #[test]
    fn test_should_copy_unstaged() {
        let dir = PathBuf::from("/repo");
        let mut wants = create_test_config(&dir);
        wants.config.copy_unstaged = true;
        let plain = create_test_config(&dir);

        assert!(!should_copy_unstaged(std::slice::from_ref(&plain), None));
        assert!(should_copy_unstaged(&[plain.clone(), wants.clone()], None));
        assert!(!should_copy_unstaged(&[wants], Some(false)));
        assert!(should_copy_unstaged(&[plain], Some(true)));
    }

    #[test]
    fn test_apply_unstaged_replaces_target() {
        let main_dir = TempDir::new().unwrap();
        let target_dir = TempDir::new().unwrap();

        fs::create_dir_all(main_dir.path().join("src")).unwrap();
        fs::write(main_dir.path().join("src/lib.rs"), "changed").unwrap();
        fs::create_dir_all(target_dir.path().join("src")).unwrap();
        fs::write(target_dir.path().join("src/lib.rs"), "committed").unwrap();

        let records = apply_unstaged(
            &["src/lib.rs".to_string(), "deleted.rs".to_string()],
            main_dir.path(),
            target_dir.path(),
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].result, OperationResult::Created);
        assert_eq!(
            fs::read_to_string(target_dir.path().join("src/lib.rs")).unwrap(),
            "changed"
        );
    }
}
