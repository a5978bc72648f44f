//! Glob pattern resolution for worktree-setup.
//!
//! Patterns are compiled once into a [`PatternSet`] and matched against paths
//! relative to a search root. Directory traversal uses `jwalk` and prunes
//! excluded directories (such as `node_modules`) before descending into them,
//! so large dependency caches never slow down a search.
//!
//! # Example
//!
//! ```rust,ignore
//! use worktree_setup_glob::{DEPENDENCY_DIRS, PatternSet, find_matches};
//!
//! let patterns = PatternSet::new(&["**/*.env"])?;
//! for rel_path in find_matches(&config_dir, &patterns, DEPENDENCY_DIRS)? {
//!     println!("{}", rel_path.display());
//! }
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod pattern;
mod walk;

pub use error::GlobError;
pub use pattern::PatternSet;
pub use walk::{DEFAULT_EXCLUDED_DIRS, DEPENDENCY_DIRS, find_matches, is_excluded};
