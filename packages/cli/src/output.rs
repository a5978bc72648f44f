//! Terminal output formatting.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use colored::Colorize;
use worktree_setup_config::{LoadFailure, LoadedConfig, get_config_display_name};
use worktree_setup_operations::{ConfigApplyResult, OperationRecord, OperationResult};

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Print a header message.
pub fn print_header(message: &str) {
    println!("\n{} {}\n", "🌳", message.bold());
}

/// Print repository info.
pub fn print_repo_info(repo_root: &str) {
    println!("Repository: {}", repo_root.cyan());
}

/// Print the discovered configs, in discovery order.
pub fn print_config_list(configs: &[LoadedConfig]) {
    println!("Found {} config{}:", configs.len(), plural(configs.len()));
    for config in configs {
        println!(
            "  {} {} {} - {}",
            "•".dimmed(),
            get_config_display_name(config).bold(),
            config.relative_path.yellow(),
            config.config.description
        );
    }
    println!();
}

/// Print configs that were found but could not be loaded.
pub fn print_load_failures(failures: &[LoadFailure]) {
    for failure in failures {
        print_warning(&format!(
            "Skipping {}: {}",
            failure.path.display(),
            failure.error
        ));
    }
}

/// Print the heading for one config being applied.
pub fn print_config_heading(config: &LoadedConfig) {
    println!(
        "{} {}",
        get_config_display_name(config).bold(),
        format!("({})", config.relative_path).dimmed()
    );
}

/// Print a plain section heading.
pub fn print_section(title: &str) {
    println!("{}", title.bold());
}

/// Print totals for one applied config, plus details of degraded operations.
pub fn print_apply_summary(result: &ConfigApplyResult) {
    let failed: Vec<&OperationRecord> = result
        .symlinks
        .iter()
        .chain(&result.copies)
        .filter(|r| r.message.is_some())
        .collect();

    for record in failed {
        if let Some(message) = &record.message {
            print_warning(&format!("{}: {message}", record.path));
        }
    }
    for template in result.templates.iter().filter(|t| t.message.is_some()) {
        if let Some(message) = &template.message {
            print_warning(&format!("{} -> {}: {message}", template.source, template.target));
        }
    }

    println!(
        "  {} created, {} existing, {} skipped\n",
        result.count(OperationResult::Created).to_string().green(),
        result.count(OperationResult::Exists),
        result.count(OperationResult::Skipped)
    );
}

/// Print a post-setup command being run.
pub fn print_command(index: usize, total: usize, cmd: &str) {
    println!("  {} {} {}", format!("[{index}/{total}]").dimmed(), "$".dimmed(), cmd);
}

/// Print success message.
pub fn print_success() {
    println!("{} Worktree setup complete!", "✅");
}

/// Print error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", "Warning:".yellow().bold(), message);
}
