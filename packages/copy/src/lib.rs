//! Fast parallel file copying with progress tracking.
//!
//! This crate provides the filesystem copy primitives used by worktree setup:
//!
//! * [`copy_if_absent`] copies a file or directory only when the target is missing
//! * [`copy_replacing`] copies a file or directory, replacing whatever is at the target
//! * [`copy_file_bytes`] copies a single regular file only when the target is missing
//!
//! Directories are enumerated in parallel with `jwalk` and copied in parallel
//! with `rayon`. Every file copy tries a copy-on-write reflink first (APFS,
//! Btrfs, XFS, `ReFS`) and falls back to a byte copy.
//!
//! # Example
//!
//! ```rust,ignore
//! use worktree_setup_copy::{copy_if_absent, count_files, CopyProgress};
//!
//! let total = count_files(&source);
//! copy_if_absent(&source, &target, |progress: &CopyProgress| {
//!     println!("{}/{} files copied", progress.files_copied, progress.files_total);
//! })?;
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod copy;
mod count;
mod error;
mod progress;

pub use copy::{CopyResult, copy_file_bytes, copy_if_absent, copy_replacing, path_present};
pub use count::{count_files, count_files_with_progress};
pub use error::CopyError;
pub use progress::{CopyProgress, ProgressTracker};
