// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Everything written to the terminal that isn't an echoed line or a help menu entry.

use std::error::Error;

use crate::SedshellError;

pub const BANNER: &str = "sedshell\n? - for help. Run with --help for documentation\n\n";

pub const COMMAND_PROMPT: &str = "Command:\n";

pub const COMMAND_LETTER_PROMPT: &str = "Command letter?\n";

pub const REGEX_PROMPT: &str = "Regex:\n";

pub const NO_COMMAND_IN_HISTORY: &str = "No command in history\n";

/// Shown when a pattern typed at the `Regex:` prompt doesn't compile. Includes the
/// compiler's explanation (which points at the offending part of the pattern).
#[must_use]
pub fn invalid_regex_message(error: &SedshellError) -> String {
    match error.source() {
        Some(source) => format!("{error}\n{source}\n"),
        None => format!("{error}\n"),
    }
}
