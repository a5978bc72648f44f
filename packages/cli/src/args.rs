//! CLI argument definitions.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use clap::Parser;

/// CLI arguments for worktree-setup.
#[derive(Debug, Parser)]
#[command(
    name = "worktree-setup",
    about = "Set up git worktrees with project-specific configurations",
    version
)]
pub struct Args {
    /// Path to the target worktree.
    #[arg(index = 1)]
    pub target_path: Option<PathBuf>,

    /// Create worktree from this branch.
    #[arg(long)]
    pub branch: Option<String>,

    /// Create a new branch for the worktree.
    #[arg(long)]
    pub new_branch: Option<String>,

    /// Only apply configs whose path contains this text (can be specified multiple times).
    #[arg(long = "config", short = 'c')]
    pub configs: Vec<String>,

    /// Skip running post-setup commands.
    #[arg(long = "no-install")]
    pub no_install: bool,

    /// Copy unstaged and untracked files from main worktree.
    #[arg(long, conflicts_with = "no_unstaged")]
    pub unstaged: bool,

    /// Skip copying unstaged files (overrides config).
    #[arg(long = "no-unstaged")]
    pub no_unstaged: bool,

    /// Skip the bulk `node_modules` copy (overrides config).
    #[arg(long = "no-node-modules")]
    pub no_node_modules: bool,

    /// List discovered configs and exit.
    #[arg(long)]
    pub list: bool,

    /// Run without prompts (requires target-path).
    #[arg(long)]
    pub non_interactive: bool,

    /// Disable progress bars (useful for CI environments).
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Number of threads used for copying directories [default: number of CPUs].
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Enable verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Args {
    /// `Some(true)` for `--unstaged`, `Some(false)` for `--no-unstaged`,
    /// `None` to let the configs decide.
    #[must_use]
    pub const fn copy_unstaged_override(&self) -> Option<bool> {
        if self.no_unstaged {
            Some(false)
        } else if self.unstaged {
            Some(true)
        } else {
            None
        }
    }

    /// `Some(false)` when `--no-node-modules` was passed.
    #[must_use]
    pub const fn copy_node_modules_override(&self) -> Option<bool> {
        if self.no_node_modules {
            Some(false)
        } else {
            None
        }
    }

    /// Whether post-setup commands may run.
    #[must_use]
    pub const fn should_run_install(&self) -> bool {
        !self.no_install
    }

    /// Whether progress bars should be drawn.
    #[must_use]
    pub const fn should_show_progress(&self) -> bool {
        !self.no_progress
    }

    /// Copy thread count, at least 1.
    #[must_use]
    pub fn job_count(&self) -> usize {
        self.jobs.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Whether prompts may be shown.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        !self.non_interactive && console::user_attended()
    }

    /// Whether a config matches the `--config` filters. No filters match everything.
    #[must_use]
    pub fn selects_config(&self, relative_path: &str) -> bool {
        self.configs.is_empty() || self.configs.iter().any(|p| relative_path.contains(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("worktree-setup").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_unstaged_override() {
        assert_eq!(parse(&[]).copy_unstaged_override(), None);
        assert_eq!(parse(&["--unstaged"]).copy_unstaged_override(), Some(true));
        assert_eq!(
            parse(&["--no-unstaged"]).copy_unstaged_override(),
            Some(false)
        );
        assert!(
            Args::try_parse_from(["worktree-setup", "--unstaged", "--no-unstaged"]).is_err()
        );
    }

    #[test]
    fn test_config_filters() {
        let args = parse(&["-c", "apps/web", "--config", "api", "../wt"]);
        assert_eq!(args.target_path, Some(PathBuf::from("../wt")));
        assert!(args.selects_config("apps/web/worktree.config.ts"));
        assert!(args.selects_config("apps/api/worktree.local.config.toml"));
        assert!(!args.selects_config("worktree.config.toml"));
        assert!(parse(&[]).selects_config("anything"));
    }

    #[test]
    fn test_job_count() {
        assert_eq!(parse(&["-j", "3"]).job_count(), 3);
        assert_eq!(parse(&["--jobs", "0"]).job_count(), 1);
        assert!(parse(&[]).job_count() >= 1);
    }
}
