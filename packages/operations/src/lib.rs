//! Config application for worktree-setup.
//!
//! This crate turns loaded configs into filesystem changes in a target worktree:
//!
//! * Path resolution (config-relative and `/`-prefixed root-relative entries)
//! * Idempotent primitives: symlink, copy-if-absent, copy-always, template-if-absent
//! * Operation planning with file counts, then execution with progress
//! * Post-setup command aggregation and sequential execution
//!
//! # Example
//!
//! ```rust,ignore
//! use worktree_setup_operations::{
//!     ApplyConfigOptions, ShellCommandRunner, apply_config, collect_post_setup_commands,
//!     run_post_setup,
//! };
//!
//! for loaded in &selected {
//!     let result = apply_config(loaded, &main_path, &target_path, &ApplyConfigOptions::default())?;
//!     println!("{}: {} created", loaded.relative_path, result.copies.len());
//! }
//!
//! let commands = collect_post_setup_commands(&selected);
//! run_post_setup(&commands, &target_path, &ShellCommandRunner, |_, _, cmd| println!("$ {cmd}"))?;
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod apply;
mod copy;
mod error;
mod plan;
mod post_setup;
mod resolve;
mod symlink;

pub use apply::{
    ApplyConfigOptions, ConfigApplyResult, OperationOutcome, OperationRecord, TemplateRecord,
    apply_config, apply_unstaged, execute_operation, list_unstaged_files, run_operation,
    should_copy_unstaged,
};
pub use copy::{
    copy_always, copy_always_with_progress, copy_if_absent, copy_if_absent_with_progress,
    template_if_absent,
};
pub use error::OperationError;
pub use plan::{
    NODE_MODULES_DIR, OperationType, PlannedOperation, plan_operations,
    plan_operations_with_progress, plan_unstaged_operations,
};
pub use post_setup::{
    CommandRunner, CommandStatus, ShellCommandRunner, collect_post_setup_commands, run_post_setup,
};
pub use resolve::{config_relative_dir, display_path, mirror_path, resolve_path, resolve_relative};
pub use symlink::create_symlink;
pub use worktree_setup_copy::CopyProgress;

/// Result of a single file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
    /// The target now exists because this run created (or replaced) it.
    Created,
    /// The target already existed; nothing was written.
    Exists,
    /// The operation could not proceed, usually because the source is missing.
    Skipped,
}

impl std::fmt::Display for OperationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Exists => write!(f, "exists"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}
