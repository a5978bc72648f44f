//! Interactive prompts using dialoguer.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::io;
use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input, MultiSelect, Select};
use worktree_setup_config::{LoadedConfig, get_config_display_name};
use worktree_setup_git::WorktreeCreateOptions;

/// Ways to create a missing worktree, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreateMode {
    AutoNamed,
    NewBranch,
    CurrentBranch,
    ExistingBranch,
    Detached,
}

/// Select which configs to apply. Returns indices in the order shown.
///
/// # Errors
///
/// * If the user cancels the selection
pub fn select_configs(configs: &[LoadedConfig]) -> io::Result<Vec<usize>> {
    if configs.len() == 1 {
        return Ok(vec![0]);
    }

    let items: Vec<String> = configs
        .iter()
        .map(|c| {
            format!(
                "{} - {} ({})",
                get_config_display_name(c),
                c.config.description,
                c.relative_path
            )
        })
        .collect();

    Ok(MultiSelect::new()
        .with_prompt("Select configurations to apply")
        .items(&items)
        .interact()?)
}

/// Prompt for the target worktree path.
///
/// # Errors
///
/// * If the user cancels the input
pub fn prompt_worktree_path() -> io::Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt("Enter the path for the new worktree")
        .interact_text()?;

    Ok(PathBuf::from(path))
}

/// Ask what a new branch should start from. `None` means the current HEAD.
fn prompt_base_branch(default_branch: Option<&str>) -> io::Result<Option<String>> {
    let mut items = vec!["Current HEAD".to_string()];
    if let Some(branch) = default_branch {
        items.push(branch.to_string());
    }
    items.push("Enter custom branch/ref...".to_string());

    let choice = Select::new()
        .with_prompt("Base the new branch off")
        .items(&items)
        .default(0)
        .interact()?;

    if choice == 0 {
        Ok(None)
    } else if choice == items.len() - 1 {
        let custom: String = Input::new()
            .with_prompt("Enter branch name or ref")
            .interact_text()?;
        Ok(Some(custom))
    } else {
        Ok(Some(items[choice].clone()))
    }
}

/// Prompt for worktree creation options.
///
/// Returns `None` if the user doesn't want to create a worktree.
///
/// # Errors
///
/// * If the user cancels the prompts
pub fn prompt_worktree_create(
    target_path: &Path,
    current_branch: Option<&str>,
    default_branch: Option<&str>,
    branches: &[String],
) -> io::Result<Option<WorktreeCreateOptions>> {
    let should_create = Confirm::new()
        .with_prompt(format!(
            "Worktree does not exist at {}. Create it?",
            target_path.display()
        ))
        .default(true)
        .interact()?;

    if !should_create {
        return Ok(None);
    }

    let worktree_name = target_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("worktree");

    let mut modes = vec![
        (
            format!("New branch (auto-named '{worktree_name}')"),
            CreateMode::AutoNamed,
        ),
        ("New branch (custom name)...".to_string(), CreateMode::NewBranch),
    ];
    if let Some(branch) = current_branch {
        modes.push((
            format!("Use current branch ({branch})"),
            CreateMode::CurrentBranch,
        ));
    }
    modes.push(("Use existing branch...".to_string(), CreateMode::ExistingBranch));
    modes.push((
        "Detached HEAD (current commit)".to_string(),
        CreateMode::Detached,
    ));

    let labels: Vec<&str> = modes.iter().map(|(label, _)| label.as_str()).collect();
    let choice = Select::new()
        .with_prompt("How should the worktree be created?")
        .items(&labels)
        .default(0)
        .interact()?;

    let options = match modes[choice].1 {
        CreateMode::AutoNamed => match prompt_base_branch(default_branch)? {
            // git only creates the auto-named branch when no ref is given.
            Some(base) => WorktreeCreateOptions {
                new_branch: Some(worktree_name.to_string()),
                branch: Some(base),
                ..Default::default()
            },
            None => WorktreeCreateOptions::default(),
        },
        CreateMode::NewBranch => {
            let branch_name: String = Input::new()
                .with_prompt("Enter new branch name")
                .interact_text()?;

            WorktreeCreateOptions {
                new_branch: Some(branch_name),
                branch: prompt_base_branch(default_branch)?,
                ..Default::default()
            }
        }
        CreateMode::CurrentBranch => WorktreeCreateOptions {
            branch: current_branch.map(String::from),
            ..Default::default()
        },
        CreateMode::ExistingBranch => {
            if branches.is_empty() {
                println!("No local branches found. Using auto-named branch instead.");
                WorktreeCreateOptions::default()
            } else {
                let branch_idx = Select::new()
                    .with_prompt("Select branch")
                    .items(branches)
                    .interact()?;

                WorktreeCreateOptions {
                    branch: Some(branches[branch_idx].clone()),
                    ..Default::default()
                }
            }
        }
        CreateMode::Detached => WorktreeCreateOptions {
            detach: true,
            ..Default::default()
        },
    };

    Ok(Some(options))
}

/// Prompt whether to run post-setup commands.
///
/// # Errors
///
/// * If the user cancels the prompt
pub fn prompt_run_install(commands: &[String]) -> io::Result<bool> {
    Ok(Confirm::new()
        .with_prompt(format!(
            "Run {} post-setup command{}?",
            commands.len(),
            if commands.len() == 1 { "" } else { "s" }
        ))
        .default(true)
        .interact()?)
}
