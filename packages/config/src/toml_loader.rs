//! Declarative (TOML) configuration loader.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::Config;

/// Parse a TOML configuration file.
///
/// The result is not validated; [`crate::load_config`] does that for every
/// source syntax.
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed as TOML or has fields of the wrong type
pub fn load_toml_config(path: &Path) -> Result<Config, ConfigError> {
    log::debug!("Loading TOML config from {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml_config(&content, path)
}

/// Parse TOML config text. `path` is only used for error reporting.
pub(crate) fn parse_toml_config(content: &str, path: &Path) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::debug!("Parsed config: {:?}", config.description);

    Ok(config)
}
