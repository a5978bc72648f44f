//! Progress bar utilities for the CLI.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::io::Write;

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const FILE_BAR_TEMPLATE: &str = "  {prefix:<30} [{bar:25.green/dim}] {pos}/{len} files";
const SCAN_BAR_TEMPLATE: &str = " Scanning [{bar:20.green/dim}] {pos}/{len} {msg}";

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━─")
}

/// Progress bars for planning and copying. Everything is hidden when disabled.
pub struct ProgressManager {
    multi: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            enabled,
        }
    }

    /// Bar for a directory copy, counting files.
    #[must_use]
    pub fn create_file_bar(&self, label: &str, total: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi.add(ProgressBar::new(total));
        pb.set_style(bar_style(FILE_BAR_TEMPLATE));
        pb.set_prefix(label.to_string());
        pb
    }

    /// Bar for planning, counting config entries.
    #[must_use]
    pub fn create_scanning_bar(&self, total: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi.add(ProgressBar::new(total));
        pb.set_style(bar_style(SCAN_BAR_TEMPLATE));
        pb
    }

    /// Print a completed operation line: a check for work done, a bullet otherwise.
    pub fn print_result(&self, label: &str, result: &str, is_success: bool) {
        let marker = if is_success {
            "✓".green()
        } else {
            "•".dimmed()
        };
        self.println(&format!("{marker} {label:<30} {}", result.dimmed()));
    }

    /// Print a completed directory operation with its file count.
    pub fn print_result_with_count(&self, label: &str, result: &str, file_count: u64) {
        self.println(&format!(
            "{} {label:<30} {} ({file_count} files)",
            "✓".green(),
            result.dimmed()
        ));
    }

    fn println(&self, line: &str) {
        self.multi.suspend(|| {
            println!("{line}");
            let _ = std::io::stdout().flush();
        });
    }

    /// Clear any active progress bars.
    pub fn clear(&self) {
        self.multi.clear().ok();
    }
}
