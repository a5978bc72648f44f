//! Configuration types for worktree-setup.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A template file mapping from source to target.
///
/// Both sides are resolved independently, so either may be root-relative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMapping {
    /// Source file path.
    pub source: String,
    /// Target file path.
    pub target: String,
}

/// Worktree setup configuration.
///
/// Paths are relative to the directory containing the config file, unless they
/// start with `/`, in which case they are relative to the repository root.
/// Absent collections deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Human-readable description of this configuration. Required.
    #[serde(default)]
    pub description: String,

    /// Paths to symlink from the main worktree.
    #[serde(default)]
    pub symlinks: Vec<String>,

    /// Paths to copy only if they don't exist in the target.
    #[serde(default)]
    pub copy: Vec<String>,

    /// Paths to always overwrite in the target.
    #[serde(default)]
    pub overwrite: Vec<String>,

    /// Glob patterns to copy (each match copied only if absent).
    #[serde(default)]
    pub copy_glob: Vec<String>,

    /// Whether to copy unstaged/untracked files from the main worktree.
    #[serde(default)]
    pub copy_unstaged: bool,

    /// Whether to bulk-copy the `node_modules` directory next to the config.
    /// Unset means yes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_node_modules: Option<bool>,

    /// Template file mappings (copy source to target if target doesn't exist).
    #[serde(default)]
    pub templates: Vec<TemplateMapping>,

    /// Commands to run in the target worktree after setup completes.
    #[serde(default)]
    pub post_setup: Vec<String>,
}

impl Config {
    /// Whether the `node_modules` bulk copy is enabled.
    #[must_use]
    pub fn should_copy_node_modules(&self) -> bool {
        self.copy_node_modules.unwrap_or(true)
    }

    /// Check the invariants every loaded config must satisfy.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidConfig`] if `description` is missing or blank
    /// * [`ConfigError::InvalidConfig`] if any declared path is empty
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            message,
        };

        if self.description.trim().is_empty() {
            return Err(invalid("`description` is required".to_string()));
        }

        let lists = [
            ("symlinks", &self.symlinks),
            ("copy", &self.copy),
            ("overwrite", &self.overwrite),
            ("copyGlob", &self.copy_glob),
        ];
        for (field, entries) in lists {
            if let Some(index) = entries.iter().position(|e| e.trim().is_empty()) {
                return Err(invalid(format!("`{field}[{index}]` is empty")));
            }
        }

        for (index, template) in self.templates.iter().enumerate() {
            if template.source.trim().is_empty() || template.target.trim().is_empty() {
                return Err(invalid(format!(
                    "`templates[{index}]` needs both source and target"
                )));
            }
        }

        Ok(())
    }
}

/// A loaded configuration with metadata.
///
/// Built once per discovered file and never modified afterwards.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration.
    pub config: Config,
    /// Absolute path to the configuration file.
    pub config_path: PathBuf,
    /// Directory containing the configuration file.
    pub config_dir: PathBuf,
    /// Path relative to repository root, for display.
    pub relative_path: String,
    /// Variant name from `worktree.<variant>.config.<ext>`; `None` for the default file.
    pub variant_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            description: "Web app".to_string(),
            symlinks: vec!["node_modules/.cache".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid().validate(Path::new("worktree.config.toml")).is_ok());
    }

    #[test]
    fn test_validate_missing_description() {
        let config = Config {
            description: "   ".to_string(),
            ..valid()
        };
        let err = config.validate(Path::new("worktree.config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig { .. }));
    }

    #[test]
    fn test_validate_empty_path() {
        let config = Config {
            copy: vec![".env".to_string(), String::new()],
            ..valid()
        };
        let err = config.validate(Path::new("worktree.config.toml")).unwrap_err();
        assert!(err.to_string().contains("copy[1]"));
    }

    #[test]
    fn test_validate_template_missing_target() {
        let config = Config {
            templates: vec![TemplateMapping {
                source: ".env.example".to_string(),
                target: String::new(),
            }],
            ..valid()
        };
        assert!(config.validate(Path::new("worktree.config.toml")).is_err());
    }

    #[test]
    fn test_copy_node_modules_defaults_to_true() {
        assert!(valid().should_copy_node_modules());
        let config = Config {
            copy_node_modules: Some(false),
            ..valid()
        };
        assert!(!config.should_copy_node_modules());
    }
}
