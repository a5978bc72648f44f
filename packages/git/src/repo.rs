//! Repository discovery and basic operations.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use git2::{BranchType, Repository};

use crate::error::GitError;

/// Open a git repository rooted exactly at the specified path.
///
/// Unlike [`discover_repo`], this does not search parent directories.
///
/// # Errors
///
/// * If the path is not a git repository
pub fn open_repo(path: &Path) -> Result<Repository, GitError> {
    log::debug!("Opening repository at {}", path.display());

    Repository::open(path).map_err(|e| GitError::OpenError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Discover a git repository by searching upward from the given path.
///
/// # Errors
///
/// * [`GitError::NotARepository`] if no repository contains `path`
pub fn discover_repo(path: &Path) -> Result<Repository, GitError> {
    log::debug!("Discovering repository from {}", path.display());

    Repository::discover(path).map_err(|e| GitError::NotARepository {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Get the root directory of a repository's working tree.
///
/// # Errors
///
/// * If the repository is bare (has no working directory)
pub fn get_repo_root(repo: &Repository) -> Result<PathBuf, GitError> {
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or(GitError::BareRepository)
}

/// Get the current branch name.
///
/// Returns `None` if HEAD is detached.
///
/// # Errors
///
/// * If the HEAD reference cannot be read
pub fn get_current_branch(repo: &Repository) -> Result<Option<String>, GitError> {
    let head = repo.head().map_err(GitError::HeadError)?;

    if head.is_branch() {
        Ok(head.shorthand().map(String::from))
    } else {
        Ok(None)
    }
}

/// Detect the repository's default branch.
///
/// Uses `origin/HEAD` when the remote has been fetched, otherwise the first of
/// `main` or `master` that exists locally.
#[must_use]
pub fn get_default_branch(repo: &Repository) -> Option<String> {
    if let Ok(reference) = repo.find_reference("refs/remotes/origin/HEAD") {
        if let Some(target) = reference.symbolic_target() {
            if let Some(name) = target.strip_prefix("refs/remotes/origin/") {
                log::debug!("Default branch from origin/HEAD: {name}");
                return Some(name.to_string());
            }
        }
    }

    ["main", "master"]
        .into_iter()
        .find(|name| repo.find_branch(name, BranchType::Local).is_ok())
        .map(String::from)
}

/// Get a sorted list of local branch names.
///
/// # Errors
///
/// * If the branch list cannot be retrieved
pub fn get_local_branches(repo: &Repository) -> Result<Vec<String>, GitError> {
    let branches = repo
        .branches(Some(BranchType::Local))
        .map_err(GitError::BranchListError)?;

    let mut names = Vec::new();
    for branch in branches {
        let (branch, _) = branch.map_err(GitError::BranchListError)?;
        if let Some(name) = branch.name().map_err(GitError::BranchListError)? {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::process::Command;

    use git2::Repository;
    use tempfile::TempDir;

    pub fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    pub fn git(dir: &std::path::Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Initialise a repository with one commit on branch `main`.
    pub fn create_test_repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();

        git(dir.path(), &["init", "-b", "main"]);
        git(dir.path(), &["config", "user.email", "test@test.com"]);
        git(dir.path(), &["config", "user.name", "Test"]);

        std::fs::write(dir.path().join("README.md"), "# Test").unwrap();
        git(dir.path(), &["add", "."]);
        git(dir.path(), &["commit", "-m", "Initial commit"]);

        let repo = Repository::open(dir.path()).unwrap();
        (dir, repo)
    }
}
