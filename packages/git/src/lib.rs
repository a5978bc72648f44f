//! Git operations for worktree-setup.
//!
//! This crate is the version-control collaborator of the setup engine. It uses
//! the `git2` library for:
//!
//! * Repository discovery and root detection
//! * Worktree listing (main worktree first) and creation
//! * Tracked/untracked file listing for config discovery
//! * Unstaged and untracked file detection
//!
//! # Example
//!
//! ```rust,ignore
//! use worktree_setup_git::{discover_repo, get_main_worktree};
//!
//! let repo = discover_repo(&std::env::current_dir()?)?;
//! let main = get_main_worktree(&repo)?;
//! println!("Main worktree: {}", main.path.display());
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod repo;
mod status;
mod worktree;

pub use error::GitError;
pub use repo::{
    discover_repo, get_current_branch, get_default_branch, get_local_branches, get_repo_root,
    open_repo,
};
pub use status::{get_unstaged_and_untracked_files, list_repo_files};
pub use worktree::{
    WorktreeCreateOptions, WorktreeInfo, create_worktree, get_main_worktree, get_worktrees,
};
