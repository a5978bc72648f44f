//! Configuration discovery and loading for worktree-setup.
//!
//! Config files live anywhere in a repository and are named
//! `worktree.config.<ext>` or `worktree.<variant>.config.<ext>`. Two source
//! syntaxes are accepted and both produce the same [`Config`]:
//!
//! * Declarative TOML (`.toml`), parsed natively
//! * Script modules (`.ts`, `.mts`, `.js`, `.mjs`), type-stripped and evaluated
//!   in a sandboxed embedded JavaScript engine
//!
//! # Example
//!
//! ```rust,ignore
//! use worktree_setup_config::load_all_configs;
//!
//! let discovered = load_all_configs(&repo_root)?;
//! for loaded in &discovered.configs {
//!     println!("{}: {}", loaded.relative_path, loaded.config.description);
//! }
//! for failure in &discovered.failures {
//!     eprintln!("skipped {}: {}", failure.path.display(), failure.error);
//! }
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod discovery;
mod error;
mod source;
mod toml_loader;
mod ts_loader;
mod types;

pub use discovery::{
    DiscoveredConfigs, LoadFailure, discover_configs, get_config_display_name, load_all_configs,
};
pub use error::ConfigError;
pub use source::{
    CONFIG_EXTENSIONS, ConfigFileName, ConfigSource, config_file_patterns, parse_config_file_name,
};
pub use toml_loader::load_toml_config;
pub use ts_loader::load_ts_config;
pub use types::{Config, LoadedConfig, TemplateMapping};

use std::path::Path;

/// Load and validate a configuration file, choosing the parser by extension.
///
/// # Arguments
///
/// * `path` - Absolute path to the configuration file
/// * `repo_root` - Path to the repository root (for the display path)
///
/// # Errors
///
/// * If the file extension is not supported
/// * If the file cannot be read or parsed
/// * [`ConfigError::InvalidConfig`] if the config fails validation
pub fn load_config(path: &Path, repo_root: &Path) -> Result<LoadedConfig, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let source = ConfigSource::from_extension(extension)
        .ok_or_else(|| ConfigError::UnsupportedFormat(extension.to_string()))?;

    let config = match source {
        ConfigSource::Declarative => load_toml_config(path)?,
        ConfigSource::ScriptModule => load_ts_config(path)?,
    };
    config.validate(path)?;

    let config_dir = path
        .parent()
        .ok_or_else(|| ConfigError::InvalidPath(path.to_path_buf()))?
        .to_path_buf();

    let relative_path = path
        .strip_prefix(repo_root)
        .map_or_else(|_| path.to_string_lossy(), |p| p.to_string_lossy())
        .to_string();

    let variant_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(parse_config_file_name)
        .and_then(|parsed| parsed.variant);

    Ok(LoadedConfig {
        config,
        config_path: path.to_path_buf(),
        config_dir,
        relative_path,
        variant_name,
    })
}
