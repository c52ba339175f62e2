// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Binding, BuiltinCommand, DispatchContext, ExitReason, LineDevice,
            RegexFilter, SedshellResult};

/// What the dispatch loop should do after a command has seen a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Move on to the next input line.
    Finished,
    /// Show the same line again and read another keystroke for it (unless the active
    /// command still wants lines, see [`Command::is_done_processing`]).
    NotFinished,
    /// Stop dispatching altogether.
    Exit(ExitReason),
}

impl LineOutcome {
    #[must_use]
    pub fn finished_if(is_finished: bool) -> Self {
        if is_finished {
            LineOutcome::Finished
        } else {
            LineOutcome::NotFinished
        }
    }
}

/// The last command typed at a `Command:` prompt (by `!` or `&`). Used by `^` and `>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub command: String,
    pub consume: bool,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(command: impl Into<String>, consume: bool) -> Self {
        Self {
            command: command.into(),
            consume,
        }
    }
}

/// Commands that handle exactly one line and are then replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneShot {
    Builtin(BuiltinCommand),
    /// A key saved with `>`. Runs the stored command against the line, and finishes the
    /// line if (and only if) the binding consumes, whether or not the command succeeds.
    Bound(Binding),
}

/// The command currently in control of the dispatch loop.
///
/// ```text
/// RunOnce ──── handles one line ──────────────────────────► replaced on next keystroke
/// SkipWhile /
/// SkipUntil ── handles lines until its regex says stop ───► replaced on next keystroke
/// ```
#[derive(Debug, Clone)]
pub enum Command {
    RunOnce(OneShot),
    SkipWhile(RegexFilter),
    SkipUntil(RegexFilter),
}

impl Command {
    #[must_use]
    pub fn new_bound(binding: Binding) -> Self { Command::RunOnce(OneShot::Bound(binding)) }

    /// When `true` the dispatch loop reads a fresh keystroke before the next line is
    /// handled; otherwise this instance gets the line.
    #[must_use]
    pub fn is_done_processing(&self) -> bool {
        match self {
            Command::RunOnce(_) => true,
            Command::SkipWhile(filter) | Command::SkipUntil(filter) => filter.is_done(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the terminal, the keybinding store, or a child process fails,
    /// or a regex typed for a filter is invalid.
    pub fn handle_line(
        &mut self,
        ctx: &mut DispatchContext,
        terminal: &mut dyn LineDevice,
        line: &str,
    ) -> SedshellResult<LineOutcome> {
        match self {
            Command::RunOnce(OneShot::Builtin(builtin)) => {
                builtin.handle_line(ctx, terminal, line)
            }
            Command::RunOnce(OneShot::Bound(binding)) => {
                ctx.executor.run_against_line(&binding.command, line)?;
                Ok(LineOutcome::finished_if(binding.consume))
            }
            Command::SkipWhile(filter) | Command::SkipUntil(filter) => {
                filter.handle_line(terminal, line)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DuplexChannel, FilterMode, KeybindingStore, LineSource, RecordingExecutor};
    use pretty_assertions::assert_eq;

    fn new_context(
        config_folder: &std::path::Path,
        results: &[bool],
    ) -> (DispatchContext, RecordingExecutor) {
        let executor = RecordingExecutor::with_results(results);
        let ctx = DispatchContext::new(
            KeybindingStore::new(config_folder),
            Box::new(executor.clone()),
        );
        (ctx, executor)
    }

    #[test]
    fn test_bound_command_uses_consume_flag_not_exit_status() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut ctx, executor) = new_context(temp_dir.path(), &[false, true]);
        let (_user, mut terminal) = DuplexChannel::new_pair("terminal");

        let mut consuming = Command::new_bound(Binding::new("false", true));
        let mut non_consuming = Command::new_bound(Binding::new("true", false));

        assert_eq!(
            consuming.handle_line(&mut ctx, &mut terminal, "x").unwrap(),
            LineOutcome::Finished
        );
        assert_eq!(
            non_consuming.handle_line(&mut ctx, &mut terminal, "x").unwrap(),
            LineOutcome::NotFinished
        );
        assert_eq!(executor.lines_run(), vec!["false x", "true x"]);
    }

    #[test]
    fn test_run_records_history_and_reports_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut ctx, executor) = new_context(temp_dir.path(), &[true, false]);
        let (user, mut terminal) = DuplexChannel::new_pair("terminal");
        user.send("  echo  \nfalse\n");

        let mut run = BuiltinCommand::Run.into_command();
        assert_eq!(
            run.handle_line(&mut ctx, &mut terminal, "hello").unwrap(),
            LineOutcome::Finished
        );
        assert_eq!(ctx.last_command(), Some(&HistoryEntry::new("echo", true)));

        let mut run = BuiltinCommand::Run.into_command();
        assert_eq!(
            run.handle_line(&mut ctx, &mut terminal, "hello").unwrap(),
            LineOutcome::NotFinished
        );
        assert_eq!(executor.lines_run(), vec!["echo hello", "false hello"]);
    }

    #[test]
    fn test_run_no_consume_never_finishes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut ctx, _executor) = new_context(temp_dir.path(), &[true]);
        let (user, mut terminal) = DuplexChannel::new_pair("terminal");
        user.send("echo\n");

        let mut run = BuiltinCommand::RunNoConsume.into_command();
        assert_eq!(
            run.handle_line(&mut ctx, &mut terminal, "1").unwrap(),
            LineOutcome::NotFinished
        );
        assert_eq!(ctx.last_command(), Some(&HistoryEntry::new("echo", false)));
    }

    #[test]
    fn test_repeat_combines_consume_and_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut ctx, executor) = new_context(temp_dir.path(), &[true, false]);
        let (_user, mut terminal) = DuplexChannel::new_pair("terminal");
        ctx.record_history(HistoryEntry::new("grep foo", true));

        let mut repeat = BuiltinCommand::Repeat.into_command();
        assert_eq!(
            repeat.handle_line(&mut ctx, &mut terminal, "a").unwrap(),
            LineOutcome::Finished
        );
        assert_eq!(
            repeat.handle_line(&mut ctx, &mut terminal, "b").unwrap(),
            LineOutcome::NotFinished
        );
        assert_eq!(executor.lines_run(), vec!["grep foo a", "grep foo b"]);
    }

    #[test]
    fn test_repeat_and_save_with_empty_history() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut ctx, executor) = new_context(temp_dir.path(), &[]);
        let (mut user, mut terminal) = DuplexChannel::new_pair("terminal");

        for builtin in [BuiltinCommand::Repeat, BuiltinCommand::SaveLast] {
            let mut command = builtin.into_command();
            assert_eq!(
                command.handle_line(&mut ctx, &mut terminal, "a").unwrap(),
                LineOutcome::NotFinished
            );
            assert_eq!(user.read_line().unwrap(), "No command in history\n");
        }
        assert!(executor.lines_run().is_empty());
    }

    #[test]
    fn test_save_last_persists_binding() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut ctx, _executor) = new_context(temp_dir.path(), &[]);
        let (mut user, mut terminal) = DuplexChannel::new_pair("terminal");
        ctx.record_history(HistoryEntry::new("less", false));
        user.send("l");

        let mut save = BuiltinCommand::SaveLast.into_command();
        assert_eq!(
            save.handle_line(&mut ctx, &mut terminal, "a").unwrap(),
            LineOutcome::NotFinished
        );
        assert_eq!(user.read_line().unwrap(), "Command letter?\n");

        let saved = KeybindingStore::new(temp_dir.path()).lookup('l').unwrap();
        assert!(matches!(
            saved,
            Some(Command::RunOnce(OneShot::Bound(binding)))
                if binding == Binding::new("less", false)
        ));
    }

    #[test]
    fn test_skip_help_and_exit() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut ctx, _executor) = new_context(temp_dir.path(), &[]);
        let (mut user, mut terminal) = DuplexChannel::new_pair("terminal");

        let outcomes: Vec<_> = [BuiltinCommand::Skip, BuiltinCommand::Help, BuiltinCommand::Exit]
            .into_iter()
            .map(|it| it.into_command().handle_line(&mut ctx, &mut terminal, "a").unwrap())
            .collect();

        assert_eq!(
            outcomes,
            vec![
                LineOutcome::Finished,
                LineOutcome::NotFinished,
                LineOutcome::Exit(ExitReason::ExitKey)
            ]
        );
        assert_eq!(user.read_line().unwrap(), "\n");
        assert_eq!(user.read_line().unwrap(), "C-d - Exit\n");
    }

    #[test]
    fn test_shell_and_run_raw_hand_back_the_line() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut ctx, executor) = new_context(temp_dir.path(), &[true]);
        let (user, mut terminal) = DuplexChannel::new_pair("terminal");
        user.send("ls -l\n");

        let mut raw = BuiltinCommand::RunRaw.into_command();
        let mut shell = BuiltinCommand::Shell.into_command();
        // Assumed: `<` never finishes the line, even though its command ran.
        assert_eq!(
            raw.handle_line(&mut ctx, &mut terminal, "ignored").unwrap(),
            LineOutcome::NotFinished
        );
        assert_eq!(
            shell.handle_line(&mut ctx, &mut terminal, "ignored").unwrap(),
            LineOutcome::NotFinished
        );
        assert_eq!(executor.raw_run(), vec!["ls -l"]);
        assert_eq!(executor.shells_started(), 1);
        // Neither of them is remembered for `^`.
        assert_eq!(ctx.last_command(), None);
    }

    #[test]
    fn test_closed_terminal_at_command_prompt() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut ctx, executor) = new_context(temp_dir.path(), &[]);
        let (user, mut terminal) = DuplexChannel::new_pair("terminal");
        user.close_outgoing();

        let mut run = BuiltinCommand::Run.into_command();
        assert_eq!(
            run.handle_line(&mut ctx, &mut terminal, "a").unwrap(),
            LineOutcome::Exit(ExitReason::TerminalClosed)
        );
        assert!(executor.lines_run().is_empty());
    }

    #[test]
    fn test_is_done_processing() {
        assert!(BuiltinCommand::Run.into_command().is_done_processing());
        assert!(Command::new_bound(Binding::new("x", true)).is_done_processing());

        let filter = Command::SkipWhile(RegexFilter::new(FilterMode::SkipWhile));
        assert!(!filter.is_done_processing());
    }
}
