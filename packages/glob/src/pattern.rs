//! Compiled glob pattern sets.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::GlobError;

/// A set of glob patterns matched against relative paths.
///
/// `*` never crosses a path separator; use `**` to match across directories.
#[derive(Debug, Clone)]
pub struct PatternSet {
    set: GlobSet,
    patterns: Vec<String>,
}

impl PatternSet {
    /// Compile a list of glob patterns.
    ///
    /// # Errors
    ///
    /// * If any pattern is not a valid glob
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, GlobError> {
        let mut builder = GlobSetBuilder::new();
        let mut owned = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| GlobError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source: e,
                })?;
            builder.add(glob);
            owned.push(pattern.to_string());
        }

        let set = builder.build().map_err(GlobError::BuildError)?;

        Ok(Self {
            set,
            patterns: owned,
        })
    }

    /// Check whether a relative path matches any pattern in the set.
    #[must_use]
    pub fn is_match(&self, path: &Path) -> bool {
        self.set.is_match(path)
    }

    /// The patterns this set was compiled from.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether the set contains no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_does_not_cross_directories() {
        let set = PatternSet::new(&["*.env"]).unwrap();
        assert!(set.is_match(Path::new("local.env")));
        assert!(!set.is_match(Path::new("nested/local.env")));
    }

    #[test]
    fn test_double_star_matches_nested() {
        let set = PatternSet::new(&["**/*.env"]).unwrap();
        assert!(set.is_match(Path::new("local.env")));
        assert!(set.is_match(Path::new("a/b/local.env")));
    }

    #[test]
    fn test_alternation() {
        let set = PatternSet::new(&["**/worktree.config.{toml,ts}"]).unwrap();
        assert!(set.is_match(Path::new("apps/web/worktree.config.ts")));
        assert!(set.is_match(Path::new("worktree.config.toml")));
        assert!(!set.is_match(Path::new("worktree.config.json")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternSet::new(&["[unclosed"]).unwrap_err();
        assert!(matches!(err, GlobError::InvalidPattern { .. }));
    }
}
