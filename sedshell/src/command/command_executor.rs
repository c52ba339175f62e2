// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The boundary between the dispatch loop and the outside world. The loop only ever
//! asks "run this, did it succeed?"; it never looks at what the command prints.

use std::{fmt::Debug,
          process::{self, Stdio}};

use crate::{SedshellError, SedshellResult};

pub const DEFAULT_SHELL: &str = "/bin/bash";

pub trait CommandExecutor: Debug + Send {
    /// Run `<command> <line>` through a shell. Returns whether it exited successfully.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell could not be started at all.
    fn run_against_line(&mut self, command: &str, line: &str) -> SedshellResult<bool>;

    /// Run `command` through a shell with `stdin` attached (the terminal).
    ///
    /// # Errors
    ///
    /// Returns an error if the shell could not be started at all.
    fn run_raw(&mut self, command: &str, stdin: Stdio) -> SedshellResult<bool>;

    /// Start an interactive shell with `stdin` attached (the terminal), and wait for it
    /// to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell could not be started at all.
    fn run_interactive_shell(&mut self, stdin: Stdio) -> SedshellResult<()>;
}

/// Runs commands with `sh -c`. Child processes inherit stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl ShellExecutor {
    #[must_use]
    pub fn new() -> Self { Self }
}

/// `"<command> <line>"`, the string handed to the shell for a bound / typed command.
#[must_use]
pub fn format_full_command(command: &str, line: &str) -> String {
    format!("{command} {line}")
}

fn wait_for(
    mut cmd: process::Command,
    command_str: &str,
) -> SedshellResult<process::ExitStatus> {
    let spawn_error = |source| SedshellError::CommandSpawn {
        command: command_str.to_string(),
        source,
    };
    let mut child = cmd.spawn().map_err(spawn_error)?;
    let status = child.wait().map_err(spawn_error)?;

    // % is Display, ? is Debug.
    tracing::debug!(message = "Command exited", command = %command_str, status = ?status);
    Ok(status)
}

impl CommandExecutor for ShellExecutor {
    fn run_against_line(&mut self, command: &str, line: &str) -> SedshellResult<bool> {
        let full_command = format_full_command(command, line);
        tracing::debug!(message = "Running", full_command = ?full_command);

        let mut cmd = process::Command::new("sh");
        cmd.arg("-c").arg(&full_command);
        Ok(wait_for(cmd, &full_command)?.success())
    }

    fn run_raw(&mut self, command: &str, stdin: Stdio) -> SedshellResult<bool> {
        tracing::debug!(message = "Running raw", command = ?command);

        let mut cmd = process::Command::new("sh");
        cmd.arg("-c").arg(command).stdin(stdin);
        Ok(wait_for(cmd, command)?.success())
    }

    fn run_interactive_shell(&mut self, stdin: Stdio) -> SedshellResult<()> {
        let shell = std::env::var("SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_string());
        tracing::debug!(message = "Starting interactive shell", shell = %shell);

        let mut cmd = process::Command::new(&shell);
        cmd.arg("-i").stdin(stdin);
        wait_for(cmd, &shell)?;
        Ok(())
    }
}

/// Records what would have been run instead of running it. Clones share their record, so
/// a test can keep one and hand another to a [`crate::DispatchContext`].
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    record: std::sync::Arc<std::sync::Mutex<ExecutorRecord>>,
}

#[cfg(test)]
#[derive(Debug, Default)]
struct ExecutorRecord {
    /// Exit statuses to report, in order. Once used up every command succeeds.
    results: std::collections::VecDeque<bool>,
    lines_run: Vec<String>,
    raw_run: Vec<String>,
    shells_started: usize,
}

#[cfg(test)]
impl RecordingExecutor {
    pub fn with_results(results: &[bool]) -> Self {
        let it = Self::default();
        it.record.lock().unwrap().results = results.iter().copied().collect();
        it
    }

    pub fn lines_run(&self) -> Vec<String> { self.record.lock().unwrap().lines_run.clone() }

    pub fn raw_run(&self) -> Vec<String> { self.record.lock().unwrap().raw_run.clone() }

    pub fn shells_started(&self) -> usize { self.record.lock().unwrap().shells_started }
}

#[cfg(test)]
impl CommandExecutor for RecordingExecutor {
    fn run_against_line(&mut self, command: &str, line: &str) -> SedshellResult<bool> {
        let mut record = self.record.lock().unwrap();
        record.lines_run.push(format_full_command(command, line));
        Ok(record.results.pop_front().unwrap_or(true))
    }

    fn run_raw(&mut self, command: &str, _stdin: Stdio) -> SedshellResult<bool> {
        let mut record = self.record.lock().unwrap();
        record.raw_run.push(command.to_string());
        Ok(record.results.pop_front().unwrap_or(true))
    }

    fn run_interactive_shell(&mut self, _stdin: Stdio) -> SedshellResult<()> {
        self.record.lock().unwrap().shells_started += 1;
        Ok(())
    }
}
