//! Error types for configuration loading.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML config {}: {source}", path.display())]
    TomlParseError {
        /// Path to the file that couldn't be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The evaluated script export could not be converted into a config.
    #[error("Failed to read exported config from {}: {source}", path.display())]
    JsonParseError {
        /// Path to the script module.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Type stripping or evaluation of a script module failed.
    #[error("Failed to evaluate {}: {message}", path.display())]
    TypeScriptEvalError {
        /// Path to the file that couldn't be evaluated.
        path: PathBuf,
        /// Error message from the compiler or the JS engine.
        message: String,
    },

    /// The document parsed but does not describe a valid config.
    #[error("Invalid config {}: {message}", path.display())]
    InvalidConfig {
        /// Path to the offending file.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// Unsupported configuration format.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration path.
    #[error("Invalid config path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// Glob pattern error while searching for configs.
    #[error("Config search failed: {0}")]
    GlobError(#[from] worktree_setup_glob::GlobError),
}
