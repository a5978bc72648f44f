//! Path resolution for config entries.
//!
//! An entry starting with `/` is relative to the repository root; anything
//! else is relative to the directory containing the config file. Resolution is
//! purely lexical: `.` and `..` are collapsed and nothing is read from disk.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;

use crate::error::OperationError;

/// Resolve a config entry to an absolute path.
///
/// * `/foo` resolves to `repo_root/foo`, and a bare `/` to `repo_root` itself
/// * `foo` resolves to `base/foo`, where `base` is the config's directory
#[must_use]
pub fn resolve_path(base: &Path, entry: &str, repo_root: &Path) -> PathBuf {
    match entry.strip_prefix('/') {
        Some(stripped) => repo_root.join(stripped).clean(),
        None => base.join(entry).clean(),
    }
}

/// Resolve a config entry to a path relative to the repository root.
///
/// `config_relative_dir` is the config's directory relative to the repository
/// root. The result is empty when the entry names the root itself, and can be
/// joined onto any worktree with [`mirror_path`].
///
/// # Errors
///
/// * [`OperationError::PathResolutionAmbiguous`] if the entry leaves the repository
pub fn resolve_relative(config_relative_dir: &Path, entry: &str) -> Result<PathBuf, OperationError> {
    let joined = match entry.strip_prefix('/') {
        Some(stripped) => PathBuf::from(stripped),
        None => config_relative_dir.join(entry),
    };

    let mut relative = PathBuf::new();
    for component in joined.clean().components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(OperationError::PathResolutionAmbiguous {
                    entry: entry.to_string(),
                    reason: "resolves outside the repository root".to_string(),
                });
            }
        }
    }

    log::debug!("Resolved `{entry}` to `{}`", relative.display());
    Ok(relative)
}

/// Join a repository-relative path onto a worktree root.
#[must_use]
pub fn mirror_path(root: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    }
}

/// Human-readable form of a repository-relative path. The root displays as `/`.
#[must_use]
pub fn display_path(relative: &Path) -> String {
    if relative.as_os_str().is_empty() {
        "/".to_string()
    } else {
        relative.to_string_lossy().replace('\\', "/")
    }
}

/// The config's directory relative to `source_root`.
///
/// Falls back to the directory of the config's repository-relative path when
/// the config was loaded through a different spelling of the root.
#[must_use]
pub fn config_relative_dir(
    config_dir: &Path,
    relative_path: &str,
    source_root: &Path,
) -> PathBuf {
    config_dir.strip_prefix(source_root).map_or_else(
        |_| {
            Path::new(relative_path)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        },
        Path::to_path_buf,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path_config_relative() {
        let root = Path::new("/repo");
        let base = Path::new("/repo/apps/web");

        assert_eq!(
            resolve_path(base, "foo/bar", root),
            PathBuf::from("/repo/apps/web/foo/bar")
        );
    }

    #[test]
    fn test_resolve_path_root_relative_ignores_depth() {
        let root = Path::new("/repo");

        for base in ["/repo", "/repo/apps/web", "/repo/a/b/c/d"] {
            assert_eq!(
                resolve_path(Path::new(base), "/shared.env", root),
                PathBuf::from("/repo/shared.env")
            );
        }
    }

    #[test]
    fn test_resolve_path_bare_slash_is_root() {
        let root = Path::new("/repo");
        assert_eq!(
            resolve_path(Path::new("/repo/apps/web"), "/", root),
            PathBuf::from("/repo")
        );
    }

    #[test]
    fn test_resolve_path_collapses_dots() {
        let root = Path::new("/repo");
        assert_eq!(
            resolve_path(Path::new("/repo/apps/web"), "./../shared/./x", root),
            PathBuf::from("/repo/apps/shared/x")
        );
    }

    #[test]
    fn test_resolve_relative() {
        let dir = Path::new("apps/web");

        assert_eq!(
            resolve_relative(dir, "foo/bar").unwrap(),
            PathBuf::from("apps/web/foo/bar")
        );
        assert_eq!(
            resolve_relative(dir, "/shared.env").unwrap(),
            PathBuf::from("shared.env")
        );
        assert_eq!(
            resolve_relative(dir, "../api/.env").unwrap(),
            PathBuf::from("apps/api/.env")
        );
        assert_eq!(resolve_relative(dir, "/").unwrap(), PathBuf::new());
        assert_eq!(resolve_relative(Path::new(""), ".").unwrap(), PathBuf::new());
    }

    #[test]
    fn test_resolve_relative_agrees_with_resolve_path() {
        let root = Path::new("/repo");
        let dir = Path::new("apps/web");

        for entry in ["data", "/.nix", "../../tools", "/a/../b", "x/./y"] {
            assert_eq!(
                mirror_path(root, &resolve_relative(dir, entry).unwrap()),
                resolve_path(&root.join(dir), entry, root),
                "entry {entry}"
            );
        }
    }

    #[test]
    fn test_resolve_relative_rejects_escape() {
        let err = resolve_relative(Path::new("apps"), "../../outside").unwrap_err();
        assert!(matches!(
            err,
            OperationError::PathResolutionAmbiguous { ref entry, .. } if entry == "../../outside"
        ));

        assert!(resolve_relative(Path::new(""), "/../etc").is_err());
    }

    #[test]
    fn test_mirror_and_display() {
        let root = Path::new("/target");
        assert_eq!(mirror_path(root, Path::new("")), PathBuf::from("/target"));
        assert_eq!(
            mirror_path(root, Path::new("apps/web")),
            PathBuf::from("/target/apps/web")
        );
        assert_eq!(display_path(Path::new("")), "/");
        assert_eq!(display_path(Path::new("apps/web/.env")), "apps/web/.env");
    }

    #[test]
    fn test_config_relative_dir() {
        assert_eq!(
            config_relative_dir(
                Path::new("/repo/apps/web"),
                "apps/web/worktree.config.toml",
                Path::new("/repo")
            ),
            PathBuf::from("apps/web")
        );
        assert_eq!(
            config_relative_dir(
                Path::new("/private/repo/apps/web"),
                "apps/web/worktree.config.toml",
                Path::new("/repo")
            ),
            PathBuf::from("apps/web")
        );
        assert_eq!(
            config_relative_dir(Path::new("/repo"), "worktree.config.toml", Path::new("/repo")),
            PathBuf::new()
        );
    }
}
