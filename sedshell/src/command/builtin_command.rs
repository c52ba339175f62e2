// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The keys `sedshell` understands out of the box. Bindings saved with `>` are looked up
//! first, so any of these can be shadowed by the user.

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::{Command, DispatchContext, ExitReason, FilterMode, HistoryEntry, LineDevice,
            LineOutcome, OneShot, RegexFilter, SedshellResult, ui_str, write_help_menu};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum BuiltinCommand {
    Run,
    RunNoConsume,
    Repeat,
    Shell,
    SaveLast,
    RunRaw,
    Skip,
    Help,
    Exit,
    SkipWhile,
    SkipUntil,
}

impl BuiltinCommand {
    #[must_use]
    pub fn from_key(key: char) -> Option<Self> {
        Self::iter().find(|builtin| builtin.key() == key)
    }

    #[must_use]
    pub fn key(self) -> char {
        match self {
            BuiltinCommand::Run => '!',
            BuiltinCommand::RunNoConsume => '&',
            BuiltinCommand::Repeat => '^',
            BuiltinCommand::Shell => '$',
            BuiltinCommand::SaveLast => '>',
            BuiltinCommand::RunRaw => '<',
            BuiltinCommand::Skip => ' ',
            BuiltinCommand::Help => '?',
            BuiltinCommand::Exit => '\x04',
            BuiltinCommand::SkipWhile => '\\',
            BuiltinCommand::SkipUntil => '/',
        }
    }

    /// Label shown in the help menu.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            BuiltinCommand::Run => "Run a shell command on the line",
            BuiltinCommand::RunNoConsume => {
                "Run a shell command, but allow other commands to run"
            }
            BuiltinCommand::Repeat => "Repeat the last command",
            BuiltinCommand::Shell => "Start an interactive shell",
            BuiltinCommand::SaveLast => "Save the last command to a key",
            BuiltinCommand::RunRaw => "Run a command and print output (ignoring line)",
            BuiltinCommand::Skip => "Skip this line",
            BuiltinCommand::Help => "List commands",
            BuiltinCommand::Exit => "Exit",
            BuiltinCommand::SkipWhile => {
                "Skip entries until a regular expression stops matching"
            }
            BuiltinCommand::SkipUntil => "Skip entries until a regular expression matches",
        }
    }

    /// Filters get fresh state every time their key is pressed; everything else handles a
    /// single line.
    #[must_use]
    pub fn into_command(self) -> Command {
        match self {
            BuiltinCommand::SkipWhile => {
                Command::SkipWhile(RegexFilter::new(FilterMode::SkipWhile))
            }
            BuiltinCommand::SkipUntil => {
                Command::SkipUntil(RegexFilter::new(FilterMode::SkipUntil))
            }
            it => Command::RunOnce(OneShot::Builtin(it)),
        }
    }

    /// Handle `line` for every single line builtin. The filters are driven by
    /// [`RegexFilter::handle_line`] instead and are a no-op here.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal, the keybinding store, or a child process fails.
    pub fn handle_line(
        self,
        ctx: &mut DispatchContext,
        terminal: &mut dyn LineDevice,
        line: &str,
    ) -> SedshellResult<LineOutcome> {
        match self {
            BuiltinCommand::Run => {
                let Some(command) = prompt_for_command(terminal)? else {
                    return Ok(LineOutcome::Exit(ExitReason::TerminalClosed));
                };
                ctx.record_history(HistoryEntry::new(&command, true));
                let succeeded = ctx.executor.run_against_line(&command, line)?;
                Ok(LineOutcome::finished_if(succeeded))
            }

            BuiltinCommand::RunNoConsume => {
                let Some(command) = prompt_for_command(terminal)? else {
                    return Ok(LineOutcome::Exit(ExitReason::TerminalClosed));
                };
                ctx.record_history(HistoryEntry::new(&command, false));
                ctx.executor.run_against_line(&command, line)?;
                Ok(LineOutcome::NotFinished)
            }

            BuiltinCommand::Repeat => {
                let Some(HistoryEntry { command, consume }) = ctx.last_command().cloned()
                else {
                    terminal.write_str(ui_str::NO_COMMAND_IN_HISTORY)?;
                    return Ok(LineOutcome::NotFinished);
                };
                let succeeded = ctx.executor.run_against_line(&command, line)?;
                Ok(LineOutcome::finished_if(consume && succeeded))
            }

            BuiltinCommand::Shell => {
                let stdin = terminal.try_clone_as_stdin()?;
                ctx.executor.run_interactive_shell(stdin)?;
                Ok(LineOutcome::NotFinished)
            }

            BuiltinCommand::SaveLast => {
                let Some(HistoryEntry { command, consume }) = ctx.last_command().cloned()
                else {
                    terminal.write_str(ui_str::NO_COMMAND_IN_HISTORY)?;
                    return Ok(LineOutcome::NotFinished);
                };
                terminal.write_str(ui_str::COMMAND_LETTER_PROMPT)?;
                terminal.flush()?;
                let Some(key) = terminal.read_char(true)? else {
                    return Ok(LineOutcome::Exit(ExitReason::TerminalClosed));
                };
                ctx.store.store(key, &command, consume)?;
                Ok(LineOutcome::NotFinished)
            }

            BuiltinCommand::RunRaw => {
                let Some(command) = prompt_for_command(terminal)? else {
                    return Ok(LineOutcome::Exit(ExitReason::TerminalClosed));
                };
                let stdin = terminal.try_clone_as_stdin()?;
                ctx.executor.run_raw(&command, stdin)?;
                Ok(LineOutcome::NotFinished)
            }

            BuiltinCommand::Skip => Ok(LineOutcome::Finished),

            BuiltinCommand::Help => {
                write_help_menu(&ctx.store, terminal)?;
                Ok(LineOutcome::NotFinished)
            }

            BuiltinCommand::Exit => Ok(LineOutcome::Exit(ExitReason::ExitKey)),

            BuiltinCommand::SkipWhile | BuiltinCommand::SkipUntil => {
                Ok(LineOutcome::NotFinished)
            }
        }
    }
}

/// `None` if the terminal was closed instead of answering.
fn prompt_for_command(terminal: &mut dyn LineDevice) -> SedshellResult<Option<String>> {
    terminal.write_str(ui_str::COMMAND_PROMPT)?;
    terminal.flush()?;
    let response = terminal.read_line()?;
    if response.is_empty() {
        return Ok(None);
    }
    Ok(Some(response.trim().to_string()))
}

/// Control characters are shown as `C-<letter>` and space as `SPACE`.
#[must_use]
pub fn format_key(key: char) -> String {
    match u32::from(key) {
        0 => "C-@".to_string(),
        ordinal @ 1..=26 => {
            let letter = char::from_u32(u32::from('a') + ordinal - 1).unwrap_or(key);
            format!("C-{letter}")
        }
        _ if key == ' ' => "SPACE".to_string(),
        _ => key.to_string(),
    }
}

/// The built in section of the help menu, sorted by key.
#[must_use]
pub fn render_builtin_menu() -> String {
    let mut builtins: Vec<BuiltinCommand> = BuiltinCommand::iter().collect();
    builtins.sort_by_key(|builtin| builtin.key());

    let lines: Vec<String> = builtins
        .into_iter()
        .map(|builtin| format!("{} - {}", format_key(builtin.key()), builtin.description()))
        .collect();

    format!("\n{}\n\n", lines.join("\n"))
}
