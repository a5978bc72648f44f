//! Error types for git operations.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Failed to open repository.
    #[error("Failed to open repository at {}: {source}", path.display())]
    OpenError {
        /// Path that was attempted.
        path: PathBuf,
        /// The underlying git2 error.
        #[source]
        source: git2::Error,
    },

    /// No repository contains the given path.
    #[error("Not a git repository (or any parent up to the root): {}", path.display())]
    NotARepository {
        /// Path the search started from.
        path: PathBuf,
        /// The underlying git2 error.
        #[source]
        source: git2::Error,
    },

    /// Repository has no working directory.
    #[error("Repository has no working directory (bare repository)")]
    BareRepository,

    /// Failed to get worktree list.
    #[error("Failed to list worktrees: {0}")]
    WorktreeListError(#[source] git2::Error),

    /// `git worktree add` exited unsuccessfully.
    #[error(
        "Failed to create worktree at {} (exit code {}): {}",
        path.display(),
        exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()),
        stderr.trim()
    )]
    WorktreeCreateError {
        /// Path where worktree creation was attempted.
        path: PathBuf,
        /// Exit code of the git process, if it exited normally.
        exit_code: Option<i32>,
        /// Captured standard error of the git process.
        stderr: String,
    },

    /// Failed to spawn the git executable.
    #[error("Failed to run git: {0}")]
    SpawnError(#[source] std::io::Error),

    /// Failed to get repository status.
    #[error("Failed to get repository status: {0}")]
    StatusError(#[source] git2::Error),

    /// Failed to read the repository index.
    #[error("Failed to read repository index: {0}")]
    IndexError(#[source] git2::Error),

    /// Failed to get HEAD reference.
    #[error("Failed to get HEAD reference: {0}")]
    HeadError(#[source] git2::Error),

    /// Failed to list branches.
    #[error("Failed to list branches: {0}")]
    BranchListError(#[source] git2::Error),

    /// Path error.
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
}
