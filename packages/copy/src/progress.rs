//! Progress reporting for copy operations.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::atomic::{AtomicU64, Ordering};

/// A point-in-time view of a running copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyProgress {
    /// Number of files the copy will produce.
    pub files_total: u64,
    /// Number of files produced so far.
    pub files_copied: u64,
    /// The file most recently handled, when known.
    pub current_file: Option<String>,
}

impl CopyProgress {
    /// Snapshot of `files_copied` out of `files_total`.
    #[must_use]
    pub const fn new(files_total: u64, files_copied: u64, current_file: Option<String>) -> Self {
        Self {
            files_total,
            files_copied,
            current_file,
        }
    }

    /// Whether every file has been copied.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.files_copied >= self.files_total
    }

    /// Progress as a percentage in `0.0..=100.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.files_total == 0 {
            return 100.0;
        }
        (self.files_copied.min(self.files_total) as f64 / self.files_total as f64) * 100.0
    }
}

/// Counters shared between the rayon workers of one directory copy.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    files_total: AtomicU64,
    files_copied: AtomicU64,
}

impl ProgressTracker {
    /// Tracker with both counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            files_total: AtomicU64::new(0),
            files_copied: AtomicU64::new(0),
        }
    }

    /// Set the number of files the copy will perform.
    pub fn set_total(&self, total: u64) {
        self.files_total.store(total, Ordering::Relaxed);
    }

    /// Record one copied file and return the new count.
    pub fn increment_copied(&self) -> u64 {
        self.files_copied.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Total number of files to copy.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.files_total.load(Ordering::Relaxed)
    }

    /// Number of files copied so far.
    #[must_use]
    pub fn copied(&self) -> u64 {
        self.files_copied.load(Ordering::Relaxed)
    }

    /// Current counters as a [`CopyProgress`].
    #[must_use]
    pub fn snapshot(&self, current_file: Option<String>) -> CopyProgress {
        CopyProgress::new(self.total(), self.copied(), current_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_of_empty_copy_is_complete() {
        let progress = CopyProgress::new(0, 0, None);
        assert!(progress.is_complete());
        assert!((progress.percentage() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tracker_snapshot() {
        let tracker = ProgressTracker::new();
        tracker.set_total(4);
        assert_eq!(tracker.increment_copied(), 1);
        assert_eq!(tracker.increment_copied(), 2);

        let snapshot = tracker.snapshot(Some("a.txt".to_string()));
        assert_eq!(snapshot, CopyProgress::new(4, 2, Some("a.txt".to_string())));
        assert!(!snapshot.is_complete());
        assert!((snapshot.percentage() - 50.0).abs() < f64::EPSILON);
    }
}
