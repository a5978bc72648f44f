//! Post-setup commands: aggregation across configs and sequential execution.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use worktree_setup_config::LoadedConfig;

use crate::error::OperationError;

/// How a command exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    /// Status for a process that exited with `code`.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Whether the process exited with code 0.
    #[must_use]
    pub const fn success(self) -> bool {
        matches!(self.code, Some(0))
    }
}

impl From<ExitStatus> for CommandStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "no exit code (terminated by signal)"),
        }
    }
}

/// Runs a shell command in a directory.
pub trait CommandRunner {
    /// Run `command` with `cwd` as the working directory and wait for it.
    ///
    /// # Errors
    ///
    /// * If the command cannot be started
    fn run(&self, command: &str, cwd: &Path) -> io::Result<CommandStatus>;
}

/// Runs commands through the platform shell (`sh -c`, or `cmd /C` on
/// Windows) with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellCommandRunner;

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str, cwd: &Path) -> io::Result<CommandStatus> {
        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        };

        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        };

        cmd.current_dir(cwd).status().map(CommandStatus::from)
    }
}

/// Merge the `postSetup` commands of the selected configs.
///
/// Commands are taken in selection order and deduplicated by exact text,
/// keeping the first occurrence.
#[must_use]
pub fn collect_post_setup_commands<'a, I>(configs: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a LoadedConfig>,
{
    let mut seen = HashSet::new();
    configs
        .into_iter()
        .flat_map(|loaded| &loaded.config.post_setup)
        .filter(|command| seen.insert(command.as_str()))
        .cloned()
        .collect()
}

/// Run commands one at a time in `cwd`, stopping at the first failure.
///
/// `on_command` is called before each command with its 1-based index, the
/// total and the command text.
///
/// # Errors
///
/// * [`OperationError::CommandSpawnError`] if a command cannot be started
/// * [`OperationError::CommandFailed`] if a command exits unsuccessfully;
///   the remaining commands are not run
pub fn run_post_setup<R, F>(
    commands: &[String],
    cwd: &Path,
    runner: &R,
    mut on_command: F,
) -> Result<(), OperationError>
where
    R: CommandRunner + ?Sized,
    F: FnMut(usize, usize, &str),
{
    let total = commands.len();

    for (index, command) in commands.iter().enumerate() {
        on_command(index + 1, total, command);
        log::info!("Running `{command}` in {}", cwd.display());

        let status = runner
            .run(command, cwd)
            .map_err(|e| OperationError::CommandSpawnError {
                command: command.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(OperationError::CommandFailed {
                command: command.clone(),
                status,
            });
        }
    }

    Ok(())
}
