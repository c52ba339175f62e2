// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The main loop. For every input line:
//!
//! ```text
//!   read line ──► "" ? ──yes──► ExitReason::EndOfInput
//!                  │ no
//!                  ▼
//!   ┌──────► echo line to terminal
//!   │              │
//!   │              ▼
//!   │    active command still wants lines? ──no──► read keystroke, resolve it
//!   │              │ yes                              (saved bindings, then builtins,
//!   │              │◄─────────────────────────────────  else show help and loop)
//!   │              ▼
//!   │    command.handle_line(line)
//!   │              │
//!   └─NotFinished──┤
//!                  └─Finished──► next line
//! ```
//!
//! At most one command is active at a time. It is replaced only when it reports that it
//! is done processing.

use crate::{BuiltinCommand, Command, DispatchContext, LineDevice, LineOutcome,
            LineSource, SedshellError, SedshellResult, ui_str, write_help_menu};

/// Why [`run_dispatch_loop`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The input stream ended (or an empty line was read).
    EndOfInput,
    /// `C-d` was pressed.
    ExitKey,
    /// The terminal was closed while waiting for a keystroke or a prompt.
    TerminalClosed,
}

/// Resolve a keystroke. Saved bindings shadow the builtins.
///
/// # Errors
///
/// Returns an error if the keybinding store can't be read.
pub fn resolve_command(ctx: &DispatchContext, key: char) -> SedshellResult<Option<Command>> {
    if let Some(command) = ctx.store.lookup(key)? {
        return Ok(Some(command));
    }
    Ok(BuiltinCommand::from_key(key).map(BuiltinCommand::into_command))
}

/// Run until the input runs out, `C-d` is pressed, or the terminal is closed.
///
/// An invalid regex typed for `\` or `/` is reported on the terminal and the filter is
/// dropped; the same line is then shown again. Every other error ends the loop.
///
/// # Errors
///
/// Returns an error if the input or terminal can't be used, the keybinding store can't
/// be accessed, or a child process can't be started.
pub fn run_dispatch_loop(
    input: &mut dyn LineSource,
    terminal: &mut dyn LineDevice,
    ctx: &mut DispatchContext,
) -> SedshellResult<ExitReason> {
    terminal.write_str(ui_str::BANNER)?;
    terminal.flush()?;

    let mut maybe_active: Option<Command> = None;

    loop {
        tracing::debug!(message = "Reading line");
        let raw_line = input.read_line()?;
        let line = raw_line.trim();
        if line.is_empty() {
            tracing::debug!(message = "End of input");
            return Ok(ExitReason::EndOfInput);
        }
        // % is Display, ? is Debug.
        tracing::debug!(message = "Read line", line = ?line);

        loop {
            terminal.write_str(&format!("{line}\n"))?;
            terminal.flush()?;

            let mut command = match maybe_active.take() {
                Some(command) if !command.is_done_processing() => command,
                _ => {
                    tracing::debug!(message = "Awaiting keystroke", line = ?line);
                    let Some(key) = terminal.read_char(true)? else {
                        tracing::debug!(message = "Terminal closed");
                        return Ok(ExitReason::TerminalClosed);
                    };

                    match resolve_command(ctx, key)? {
                        Some(command) => command,
                        None => {
                            tracing::debug!(message = "Unknown key", key = ?key);
                            write_help_menu(&ctx.store, terminal)?;
                            continue;
                        }
                    }
                }
            };

            tracing::debug!(message = "Running command", command = ?command, line = ?line);
            match command.handle_line(ctx, terminal, line) {
                Ok(LineOutcome::Finished) => {
                    maybe_active = Some(command);
                    break;
                }
                Ok(LineOutcome::NotFinished) => maybe_active = Some(command),
                Ok(LineOutcome::Exit(exit_reason)) => {
                    tracing::debug!(message = "Exiting", exit_reason = ?exit_reason);
                    return Ok(exit_reason);
                }
                Err(error @ SedshellError::InvalidRegex { .. }) => {
                    tracing::warn!(message = "Discarding filter", error = ?error);
                    terminal.write_str(&ui_str::invalid_regex_message(&error))?;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
