//! Worktree operations.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository;

use crate::error::GitError;
use crate::repo::get_repo_root;

/// Information about a git worktree.
#[derive(Debug, Clone)]
pub struct WorktreeInfo {
    /// Filesystem path to the worktree.
    pub path: PathBuf,
    /// Whether this is the main worktree.
    pub is_main: bool,
    /// Branch name if not detached.
    pub branch: Option<String>,
    /// Abbreviated commit hash of HEAD.
    pub commit: Option<String>,
}

/// Options for creating a new worktree.
///
/// With everything unset, git creates a branch named after the final path
/// component. When both `new_branch` and `branch` are set, the new branch
/// starts at `branch`.
#[derive(Debug, Clone, Default)]
pub struct WorktreeCreateOptions {
    /// Branch or ref to check out (or to base `new_branch` on).
    pub branch: Option<String>,
    /// Create and check out a new branch.
    pub new_branch: Option<String>,
    /// Create worktree with detached HEAD.
    pub detach: bool,
}

impl WorktreeCreateOptions {
    /// Build the argument list for `git worktree add`.
    fn to_args(&self, path: &Path) -> Vec<String> {
        let mut args = vec!["worktree".to_string(), "add".to_string()];

        if self.detach {
            args.push("--detach".to_string());
        }

        if let Some(new_branch) = &self.new_branch {
            args.push("-b".to_string());
            args.push(new_branch.clone());
        }

        args.push(path.to_string_lossy().into_owned());

        if let Some(branch) = &self.branch {
            args.push(branch.clone());
        }

        args
    }
}

/// Get a list of all worktrees for a repository.
///
/// The main worktree is always at index 0 with `is_main` set; linked worktrees
/// follow in the order git reports them. Callers may rely on this ordering.
///
/// # Errors
///
/// * If the repository is bare
/// * If the worktree list cannot be retrieved
pub fn get_worktrees(repo: &Repository) -> Result<Vec<WorktreeInfo>, GitError> {
    log::debug!("Getting worktree list");

    // A linked worktree's handle reports its own workdir; the common git
    // directory always belongs to the main worktree.
    let common_dir = repo.commondir();
    let main_repo = Repository::open(common_dir).map_err(|e| GitError::OpenError {
        path: common_dir.to_path_buf(),
        source: e,
    })?;

    let main_path = get_repo_root(&main_repo)?;
    let mut worktrees = vec![worktree_info(&main_repo, &main_path, true)];

    let names = main_repo
        .worktrees()
        .map_err(GitError::WorktreeListError)?;

    for name in names.iter().flatten() {
        let Ok(wt) = main_repo.find_worktree(name) else {
            continue;
        };
        let wt_path = wt.path();
        match Repository::open(wt_path) {
            Ok(wt_repo) => worktrees.push(worktree_info(&wt_repo, wt_path, false)),
            Err(e) => log::debug!("Skipping worktree {name}: {e}"),
        }
    }

    log::debug!("Found {} worktrees", worktrees.len());
    Ok(worktrees)
}

fn worktree_info(repo: &Repository, path: &Path, is_main: bool) -> WorktreeInfo {
    let head = repo.head().ok();

    let branch = head
        .as_ref()
        .filter(|h| h.is_branch())
        .and_then(|h| h.shorthand().map(String::from));

    let commit = head
        .as_ref()
        .and_then(git2::Reference::target)
        .map(|oid| oid.to_string().chars().take(8).collect());

    WorktreeInfo {
        path: path.to_path_buf(),
        is_main,
        branch,
        commit,
    }
}

/// Get the main worktree (the source root for all setup operations).
///
/// # Errors
///
/// * If the worktree list cannot be read
pub fn get_main_worktree(repo: &Repository) -> Result<WorktreeInfo, GitError> {
    let mut worktrees = get_worktrees(repo)?;
    Ok(worktrees.swap_remove(0))
}

/// Create a new worktree using the git CLI.
///
/// git2's worktree API cannot set up branch tracking the way
/// `git worktree add` does, so this shells out.
///
/// # Errors
///
/// * [`GitError::SpawnError`] if git cannot be run
/// * [`GitError::WorktreeCreateError`] with exit code and stderr if git fails
pub fn create_worktree(
    repo: &Repository,
    path: &Path,
    options: &WorktreeCreateOptions,
) -> Result<(), GitError> {
    log::info!("Creating worktree at {}", path.display());

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|_| GitError::InvalidPath(path.to_path_buf()))?;
    }

    let repo_root = get_repo_root(repo)?;
    let args = options.to_args(path);

    log::debug!("Running: git {}", args.join(" "));

    let output = Command::new("git")
        .args(&args)
        .current_dir(&repo_root)
        .output()
        .map_err(GitError::SpawnError)?;

    if !output.status.success() {
        return Err(GitError::WorktreeCreateError {
            path: path.to_path_buf(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    log::info!("Created worktree at {}", path.display());
    Ok(())
}
