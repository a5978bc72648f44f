//! Error types for glob resolution.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error;

/// Errors that can occur while compiling glob patterns.
#[derive(Debug, Error)]
pub enum GlobError {
    /// A pattern could not be parsed.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as written in the config.
        pattern: String,
        /// The underlying globset error.
        #[source]
        source: globset::Error,
    },

    /// The compiled pattern set could not be built.
    #[error("Failed to build glob set: {0}")]
    BuildError(#[source] globset::Error),
}
