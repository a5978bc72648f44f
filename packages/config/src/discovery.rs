//! Configuration file discovery.
//!
//! Finds worktree configuration files anywhere in a repository. The git index
//! (tracked plus untracked, non-ignored files) is the preferred source since it
//! is fast and honours ignore rules; when the repository cannot be opened a
//! pruned parallel directory walk is used instead.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use worktree_setup_git::{GitError, list_repo_files, open_repo};
use worktree_setup_glob::{DEFAULT_EXCLUDED_DIRS, PatternSet, find_matches, is_excluded};

use crate::error::ConfigError;
use crate::load_config;
use crate::source::{config_file_patterns, parse_config_file_name};
use crate::types::LoadedConfig;

/// A config file that was discovered but could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    /// Path to the config file.
    pub path: PathBuf,
    /// Why it could not be loaded.
    pub error: ConfigError,
}

/// Result of loading every config in a repository.
#[derive(Debug, Default)]
pub struct DiscoveredConfigs {
    /// Successfully loaded configs, ordered by absolute path.
    pub configs: Vec<LoadedConfig>,
    /// Files that failed to load. These never abort the batch.
    pub failures: Vec<LoadFailure>,
}

/// Discover all worktree configuration files in a repository.
///
/// Matches `worktree.config.<ext>` and `worktree.<variant>.config.<ext>` and
/// skips `node_modules`, `.git` and `target` directories. The result is
/// deduplicated and sorted lexicographically by absolute path, so a config's
/// position is stable across runs.
///
/// # Errors
///
/// * If the built-in filename patterns fail to compile
pub fn discover_configs(repo_root: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    log::debug!("Discovering configs in {}", repo_root.display());

    let patterns = PatternSet::new(&config_file_patterns())?;

    let mut configs = match discover_with_git(repo_root, &patterns) {
        Ok(configs) => configs,
        Err(e) => {
            log::debug!("Git file listing unavailable ({e}), walking the directory tree");
            find_matches(repo_root, &patterns, DEFAULT_EXCLUDED_DIRS)?
                .into_iter()
                .filter(|rel_path| is_config_file(rel_path))
                .map(|rel_path| repo_root.join(rel_path))
                .collect()
        }
    };

    configs.sort();
    configs.dedup();
    log::debug!("Found {} config files", configs.len());

    Ok(configs)
}

fn discover_with_git(repo_root: &Path, patterns: &PatternSet) -> Result<Vec<PathBuf>, GitError> {
    let repo = open_repo(repo_root)?;

    Ok(list_repo_files(&repo)?
        .into_iter()
        .map(PathBuf::from)
        .filter(|rel_path| {
            patterns.is_match(rel_path)
                && !is_excluded(rel_path, DEFAULT_EXCLUDED_DIRS)
                && is_config_file(rel_path)
        })
        .map(|rel_path| repo_root.join(rel_path))
        // Tracked files deleted from the working tree are still in the index.
        .filter(|path| path.is_file())
        .collect())
}

fn is_config_file(rel_path: &Path) -> bool {
    rel_path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(parse_config_file_name)
        .is_some()
}

/// Discover and load every config in a repository.
///
/// A file that fails to load is logged, recorded in
/// [`DiscoveredConfigs::failures`] and excluded; the rest still load.
///
/// # Errors
///
/// * If discovery itself fails
pub fn load_all_configs(repo_root: &Path) -> Result<DiscoveredConfigs, ConfigError> {
    let mut discovered = DiscoveredConfigs::default();

    for path in discover_configs(repo_root)? {
        match load_config(&path, repo_root) {
            Ok(config) => discovered.configs.push(config),
            Err(error) => {
                log::warn!("Skipping config {}: {error}", path.display());
                discovered.failures.push(LoadFailure { path, error });
            }
        }
    }

    Ok(discovered)
}

/// Get a display name for a loaded configuration.
///
/// Uses the config directory's name, with the variant in parentheses.
#[must_use]
pub fn get_config_display_name(config: &LoadedConfig) -> String {
    let base = config
        .config_dir
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .filter(|name| name != "." && name != "..")
        .unwrap_or_else(|| config.relative_path.clone());

    match &config.variant_name {
        Some(variant) => format!("{base} ({variant})"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_discover_configs_sorted() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "worktree.config.ts", "export default { description: 'root' };");
        write(root, "apps/web/worktree.minimal.config.ts", "");
        write(root, "apps/api/worktree.config.toml", "");
        write(root, "apps/api/worktree.config.json", "");
        write(root, "node_modules/pkg/worktree.config.toml", "");
        write(root, "target/debug/worktree.config.toml", "");
        write(root, "apps/web/worktree..config.toml", "");

        let configs = discover_configs(root).unwrap();

        assert_eq!(
            configs,
            vec![
                root.join("apps/api/worktree.config.toml"),
                root.join("apps/web/worktree.minimal.config.ts"),
                root.join("worktree.config.ts"),
            ]
        );
    }

    #[test]
    fn test_load_all_configs_isolates_failures() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "apps/api/worktree.config.toml", "copy = [\".env\"]\n");
        write(
            root,
            "apps/web/worktree.config.toml",
            "description = \"Web\"\n",
        );
        write(root, "apps/docs/worktree.config.toml", "description = [\n");

        let discovered = load_all_configs(root).unwrap();

        assert_eq!(discovered.configs.len(), 1);
        assert_eq!(discovered.configs[0].config.description, "Web");
        assert_eq!(discovered.failures.len(), 2);
        assert!(discovered.failures.iter().any(|f| matches!(
            f.error,
            ConfigError::InvalidConfig { .. }
        )));
    }

    #[test]
    fn test_load_all_configs_variant_names() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "worktree.config.toml", "description = \"Root\"\n");
        write(
            root,
            "apps/web/worktree.minimal.config.toml",
            "description = \"Minimal\"\n",
        );

        let discovered = load_all_configs(root).unwrap();
        let variants: Vec<Option<&str>> = discovered
            .configs
            .iter()
            .map(|c| c.variant_name.as_deref())
            .collect();

        assert_eq!(variants, vec![Some("minimal"), None]);
        assert_eq!(
            discovered.configs[0].relative_path,
            "apps/web/worktree.minimal.config.toml"
        );
    }

    #[test]
    fn test_get_config_display_name() {
        let mut config = LoadedConfig {
            config: crate::types::Config::default(),
            config_path: PathBuf::from("/repo/apps/my-app/worktree.config.toml"),
            config_dir: PathBuf::from("/repo/apps/my-app"),
            relative_path: "apps/my-app/worktree.config.toml".to_string(),
            variant_name: None,
        };

        assert_eq!(get_config_display_name(&config), "my-app");

        config.variant_name = Some("minimal".to_string());
        assert_eq!(get_config_display_name(&config), "my-app (minimal)");
    }
}
