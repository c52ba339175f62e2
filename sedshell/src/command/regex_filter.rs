// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Multi line filters: skip lines *while* a regex matches, or *until* it matches.
//!
//! ```text
//!                    first line                 keep skipping
//!                  (prompt "Regex:")            ┌────────────┐
//!  ┌────────────────┐      │      ┌────────┐    │            │
//!  │ AwaitingRegex  ├──────┴─────►│ Active ├────┘            │
//!  └────────────────┘             └───┬────┘ ◄───────────────┘
//!                                     │ stop condition met
//!                                     ▼
//!                                 ┌────────┐
//!                                 │  Done  │ (line is handed back to dispatch)
//!                                 └────────┘
//! ```

use regex::{Regex, RegexBuilder};

use crate::{ExitReason, LineDevice, LineOutcome, SedshellError, SedshellResult, ui_str};

/// Which way round the regex is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Skip lines while they match, stop at the first line that doesn't.
    SkipWhile,
    /// Skip lines while they don't match, stop at the first line that does.
    SkipUntil,
}

impl FilterMode {
    #[must_use]
    pub fn should_stop(self, is_match: bool) -> bool {
        match self {
            FilterMode::SkipWhile => !is_match,
            FilterMode::SkipUntil => is_match,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FilterState {
    AwaitingRegex,
    Active(Regex),
    Done,
}

#[derive(Debug, Clone)]
pub struct RegexFilter {
    mode: FilterMode,
    state: FilterState,
}

/// Matching is case insensitive and unanchored (a match anywhere in the line counts).
///
/// # Errors
///
/// Returns [`SedshellError::InvalidRegex`] if `pattern` doesn't compile.
pub fn try_compile_filter_regex(pattern: &str) -> SedshellResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| SedshellError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })
}

impl RegexFilter {
    #[must_use]
    pub fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            state: FilterState::AwaitingRegex,
        }
    }

    #[must_use]
    pub fn mode(&self) -> FilterMode { self.mode }

    #[must_use]
    pub fn state(&self) -> &FilterState { &self.state }

    #[must_use]
    pub fn is_done(&self) -> bool { matches!(self.state, FilterState::Done) }

    /// # Errors
    ///
    /// Returns an error if the terminal can't be used for the `Regex:` prompt, or the
    /// pattern typed there is invalid.
    pub fn handle_line(
        &mut self,
        terminal: &mut dyn LineDevice,
        line: &str,
    ) -> SedshellResult<LineOutcome> {
        if matches!(self.state, FilterState::AwaitingRegex) {
            let Some(pattern) = prompt_for_regex(terminal)? else {
                return Ok(LineOutcome::Exit(ExitReason::TerminalClosed));
            };
            self.state = FilterState::Active(try_compile_filter_regex(&pattern)?);
        }

        let FilterState::Active(regex) = &self.state else {
            // Done filters are discarded by the dispatch loop before they see a line.
            return Ok(LineOutcome::NotFinished);
        };

        if self.mode.should_stop(regex.is_match(line)) {
            // % is Display, ? is Debug.
            tracing::debug!(message = "Finished skipping", mode = ?self.mode, line = %line);
            terminal.write_str("\n")?;
            self.state = FilterState::Done;
            Ok(LineOutcome::NotFinished)
        } else {
            tracing::debug!(message = "Skipping", mode = ?self.mode, line = %line);
            Ok(LineOutcome::Finished)
        }
    }
}

/// Only the trailing newline is removed, so leading / trailing spaces stay part of the
/// pattern. `None` if the terminal was closed instead of answering.
fn prompt_for_regex(terminal: &mut dyn LineDevice) -> SedshellResult<Option<String>> {
    terminal.write_str(ui_str::REGEX_PROMPT)?;
    terminal.flush()?;
    let response = terminal.read_line()?;
    if response.is_empty() {
        return Ok(None);
    }
    Ok(Some(response.strip_suffix('\n').unwrap_or(&response).to_string()))
}
