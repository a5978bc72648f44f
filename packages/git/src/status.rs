//! File status detection and file listing.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use git2::{Repository, Status, StatusOptions};

use crate::error::GitError;

/// Get a list of files with unstaged modifications plus untracked files.
///
/// Returns sorted file paths relative to the repository root. Ignored files
/// are never included.
///
/// # Errors
///
/// * If the repository status cannot be read
pub fn get_unstaged_and_untracked_files(repo: &Repository) -> Result<Vec<String>, GitError> {
    log::debug!("Getting unstaged and untracked files");

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .include_ignored(false)
        .recurse_untracked_dirs(true)
        .exclude_submodules(true);

    let statuses = repo
        .statuses(Some(&mut opts))
        .map_err(GitError::StatusError)?;

    let mut files: Vec<String> = statuses
        .iter()
        .filter(|entry| {
            entry.status().intersects(
                Status::WT_MODIFIED
                    | Status::WT_DELETED
                    | Status::WT_TYPECHANGE
                    | Status::WT_RENAMED
                    | Status::WT_NEW,
            )
        })
        .filter_map(|entry| entry.path().map(String::from))
        .collect();

    files.sort();
    files.dedup();

    log::debug!("Found {} unstaged/untracked files", files.len());
    Ok(files)
}

/// List every file git knows about: tracked files from the index plus
/// untracked files that are not ignored.
///
/// Paths are relative to the repository root, sorted and deduplicated. This
/// respects `.gitignore` rules transitively, which makes it a fast source for
/// repository-wide file searches.
///
/// # Errors
///
/// * If the index or status cannot be read
pub fn list_repo_files(repo: &Repository) -> Result<Vec<String>, GitError> {
    let index = repo.index().map_err(GitError::IndexError)?;

    let mut files: Vec<String> = index
        .iter()
        .map(|entry| String::from_utf8_lossy(&entry.path).into_owned())
        .collect();

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .include_ignored(false)
        .recurse_untracked_dirs(true)
        .exclude_submodules(true);

    let statuses = repo
        .statuses(Some(&mut opts))
        .map_err(GitError::StatusError)?;

    files.extend(
        statuses
            .iter()
            .filter(|entry| entry.status().contains(Status::WT_NEW))
            .filter_map(|entry| entry.path().map(String::from)),
    );

    files.sort();
    files.dedup();

    log::debug!("Repository lists {} files", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::test_support::{create_test_repo, git_available};

    #[test]
    fn test_get_unstaged_files_empty() {
        if !git_available() {
            return;
        }
        let (_dir, repo) = create_test_repo();
        let files = get_unstaged_and_untracked_files(&repo).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_get_unstaged_files_with_changes() {
        if !git_available() {
            return;
        }
        let (dir, repo) = create_test_repo();

        std::fs::write(dir.path().join("untracked.txt"), "new file").unwrap();
        std::fs::write(dir.path().join("README.md"), "# Modified").unwrap();

        let files = get_unstaged_and_untracked_files(&repo).unwrap();
        assert_eq!(files, vec!["README.md".to_string(), "untracked.txt".to_string()]);
    }

    #[test]
    fn test_list_repo_files_respects_gitignore() {
        if !git_available() {
            return;
        }
        let (dir, repo) = create_test_repo();

        std::fs::write(dir.path().join(".gitignore"), "ignored/\n").unwrap();
        std::fs::create_dir_all(dir.path().join("ignored")).unwrap();
        std::fs::write(dir.path().join("ignored/worktree.config.toml"), "").unwrap();
        std::fs::create_dir_all(dir.path().join("apps/web")).unwrap();
        std::fs::write(dir.path().join("apps/web/worktree.config.toml"), "").unwrap();

        let files = list_repo_files(&repo).unwrap();

        assert!(files.contains(&"README.md".to_string()));
        assert!(files.contains(&"apps/web/worktree.config.toml".to_string()));
        assert!(!files.iter().any(|f| f.starts_with("ignored/")));
    }
}
