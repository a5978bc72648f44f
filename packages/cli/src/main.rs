//! worktree-setup CLI entry point.
//!
//! A tool for setting up git worktrees with project-specific configurations.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod args;
mod interactive;
mod output;
mod progress;

use std::env;
use std::path::{Path, PathBuf};

use clap::Parser;
use path_clean::PathClean;

use args::Args;
use progress::ProgressManager;
use worktree_setup_config::{LoadedConfig, load_all_configs};
use worktree_setup_git::{
    WorktreeCreateOptions, create_worktree, discover_repo, get_current_branch, get_default_branch,
    get_local_branches, get_main_worktree, get_repo_root,
};
use worktree_setup_operations::{
    ApplyConfigOptions, ConfigApplyResult, OperationOutcome, OperationResult, OperationType,
    PlannedOperation, ShellCommandRunner, collect_post_setup_commands, list_unstaged_files,
    plan_operations_with_progress, plan_unstaged_operations, run_operation, run_post_setup,
    should_copy_unstaged,
};

fn main() {
    let args = Args::parse();

    if args.verbose {
        // SAFETY: We're setting this before any other threads are spawned
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    pretty_env_logger::init();

    if let Err(e) = run(&args) {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let interactive = args.is_interactive();

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(args.job_count())
        .build_global()
    {
        log::warn!("Could not configure copy thread pool: {e}");
    }

    let cwd = env::current_dir()?;
    let repo = discover_repo(&cwd)?;
    let repo_root = get_repo_root(&repo)?;

    output::print_header("Worktree Setup");
    output::print_repo_info(&repo_root.to_string_lossy());
    println!();

    let discovered = load_all_configs(&repo_root)?;
    output::print_load_failures(&discovered.failures);
    let all_configs = discovered.configs;

    if all_configs.is_empty() {
        println!("No worktree.config.toml or worktree.config.ts files found.");
        println!("Create a worktree.config.toml file to define your setup configuration.");
        return Ok(());
    }

    output::print_config_list(&all_configs);

    if args.list {
        return Ok(());
    }

    let selected_indices: Vec<usize> = if !args.configs.is_empty() || !interactive {
        (0..all_configs.len())
            .filter(|&i| args.selects_config(&all_configs[i].relative_path))
            .collect()
    } else {
        interactive::select_configs(&all_configs)?
    };

    if selected_indices.is_empty() {
        println!("No configs selected. Exiting.");
        return Ok(());
    }

    let selected: Vec<LoadedConfig> = selected_indices
        .iter()
        .map(|&i| all_configs[i].clone())
        .collect();

    let target_path = match &args.target_path {
        Some(path) => path.clone(),
        None if interactive => interactive::prompt_worktree_path()?,
        None => return Err("Target path is required in non-interactive mode.".into()),
    };
    let target_path = absolute(&cwd, &target_path);

    let main_worktree = get_main_worktree(&repo)?;
    if target_path == main_worktree.path.clean() {
        return Err("Cannot set up the main worktree. This tool is for secondary worktrees.".into());
    }

    if !target_path.exists() {
        let options = if interactive {
            let current_branch = get_current_branch(&repo)?;
            let default_branch = get_default_branch(&repo);
            let branches = get_local_branches(&repo)?;
            interactive::prompt_worktree_create(
                &target_path,
                current_branch.as_deref(),
                default_branch.as_deref(),
                &branches,
            )?
        } else {
            // Without --branch/--new-branch git creates an auto-named branch.
            Some(WorktreeCreateOptions {
                branch: args.branch.clone(),
                new_branch: args.new_branch.clone(),
                detach: false,
            })
        };

        if let Some(options) = options {
            println!("Creating worktree at {}...", target_path.display());
            create_worktree(&repo, &target_path, &options)?;
        }
    }

    if !target_path.exists() {
        return Err(format!("Target path does not exist: {}", target_path.display()).into());
    }

    println!("\nSetting up worktree: {}", target_path.display());
    println!("Main worktree: {}\n", main_worktree.path.display());

    let progress_mgr = ProgressManager::new(args.should_show_progress());
    let options = ApplyConfigOptions {
        copy_node_modules: args.copy_node_modules_override(),
    };

    // Plan every config first: a rejected entry stops the run before anything is written.
    let mut plans = Vec::with_capacity(selected.len());
    for config in &selected {
        let bar = progress_mgr.create_scanning_bar(0);
        let planned = plan_operations_with_progress(
            config,
            &main_worktree.path,
            &target_path,
            &options,
            &|current, total, path, file_count| {
                bar.set_length(to_u64(total));
                bar.set_position(to_u64(current));
                match file_count {
                    Some(n) => bar.set_message(format!("{path} ({n} files)")),
                    None => bar.set_message(path.to_string()),
                }
            },
        );
        bar.finish_and_clear();
        plans.push((config, planned?));
    }

    for (config, operations) in plans {
        output::print_config_heading(config);

        let mut result = ConfigApplyResult::new(config.clone());
        for op in &operations {
            let outcome = execute_with_progress(&progress_mgr, op);
            result.record(op, outcome);
        }

        progress_mgr.clear();
        output::print_apply_summary(&result);
    }

    if should_copy_unstaged(&selected, args.copy_unstaged_override()) {
        copy_unstaged(&progress_mgr, &main_worktree.path, &target_path);
    }

    let commands = collect_post_setup_commands(&selected);
    if !commands.is_empty() && args.should_run_install() {
        let should_run = !interactive || interactive::prompt_run_install(&commands)?;

        if should_run {
            println!("Running post-setup commands:");
            run_post_setup(
                &commands,
                &target_path,
                &ShellCommandRunner,
                output::print_command,
            )?;
            println!();
        }
    }

    output::print_success();
    Ok(())
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.clean()
    } else {
        cwd.join(path).clean()
    }
}

fn to_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Copy unstaged and untracked files once, after every config has been applied.
fn copy_unstaged(progress_mgr: &ProgressManager, main_path: &Path, target_path: &Path) {
    let files = match list_unstaged_files(main_path) {
        Ok(files) => files,
        Err(e) => {
            output::print_warning(&format!("Could not list unstaged files: {e}"));
            return;
        }
    };

    let operations = plan_unstaged_operations(&files, main_path, target_path);
    if operations.is_empty() {
        return;
    }

    output::print_section("Unstaged and untracked files");
    for op in &operations {
        execute_with_progress(progress_mgr, op);
    }
    progress_mgr.clear();
    println!();
}

/// Run one operation, showing a progress bar for directory copies, and print its result.
fn execute_with_progress(progress_mgr: &ProgressManager, op: &PlannedOperation) -> OperationOutcome {
    let label = op.label();

    let outcome = if op.is_directory && op.file_count > 1 {
        let bar = progress_mgr.create_file_bar(&label, op.file_count);
        let outcome = run_operation(op, |completed, _total| bar.set_position(completed));
        bar.finish_and_clear();
        outcome
    } else {
        run_operation(op, |_, _| {})
    };

    let result_str = format_result_string(&outcome, op.operation_type);
    let created = outcome.result == OperationResult::Created;
    if created && op.is_directory {
        progress_mgr.print_result_with_count(&label, &result_str, op.file_count);
    } else {
        progress_mgr.print_result(&label, &result_str, created);
    }

    outcome
}

/// Format result string based on operation type.
fn format_result_string(outcome: &OperationOutcome, op_type: OperationType) -> String {
    match (outcome.result, op_type) {
        (OperationResult::Created, OperationType::Symlink) => "symlink".to_string(),
        (OperationResult::Created, OperationType::Overwrite | OperationType::Unstaged) => {
            "overwritten".to_string()
        }
        (OperationResult::Created, OperationType::Template) => "created".to_string(),
        (
            OperationResult::Created,
            OperationType::Copy | OperationType::CopyGlob | OperationType::NodeModules,
        ) => "copied".to_string(),
        (OperationResult::Exists, _) => "exists".to_string(),
        (OperationResult::Skipped, _) if outcome.message.is_some() => "failed".to_string(),
        (OperationResult::Skipped, _) => "skipped".to_string(),
    }
}
