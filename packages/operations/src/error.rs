//! Error types for file operations.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

use crate::post_setup::CommandStatus;

/// Errors that can occur during file operations.
#[derive(Debug, Error)]
pub enum OperationError {
    /// IO error during file operation.
    #[error("IO error at {}: {source}", path.display())]
    IoError {
        /// Path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create symlink.
    #[error("Failed to create symlink {} -> {}: {error}", link.display(), original.display())]
    SymlinkError {
        /// The path the symlink points to.
        original: PathBuf,
        /// The symlink being created.
        link: PathBuf,
        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// A declared path cannot be mapped onto the source and target trees.
    #[error("Ambiguous path `{entry}`: {reason}")]
    PathResolutionAmbiguous {
        /// The entry as written in the config.
        entry: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A post-setup command exited unsuccessfully.
    #[error("Command `{command}` failed with {status}")]
    CommandFailed {
        /// The command text.
        command: String,
        /// How the command exited.
        status: CommandStatus,
    },

    /// A post-setup command could not be started.
    #[error("Failed to run `{command}`: {source}")]
    CommandSpawnError {
        /// The command text.
        command: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Copy engine error.
    #[error(transparent)]
    CopyError(#[from] worktree_setup_copy::CopyError),

    /// Glob pattern error.
    #[error("Glob pattern error: {0}")]
    GlobError(#[from] worktree_setup_glob::GlobError),

    /// Git operation error.
    #[error("Git error: {0}")]
    GitError(#[from] worktree_setup_git::GitError),
}
