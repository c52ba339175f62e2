// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Command-line argument parsing for sedshell.

use clap::Parser;
use std::path::PathBuf;
use tracing_core::LevelFilter;

/// Run actions against lines of input, chosen with a single keystroke.
#[derive(Debug, Parser)]
#[command(
    name = "sedshell",
    about = "Interactive, interactively-extendable tool for doing things based on lines",
    long_about = "Reads lines from stdin and shows each one on the terminal. Press a key \
                  to choose what happens to the line: `!` runs a shell command with the \
                  line appended, `&` does the same without moving on, `>` binds the last \
                  command to a key, `\\` and `/` skip lines while / until a regex \
                  matches.\n\n\
                  Press `?` at any time for the list of keys. Keys you bind are saved in \
                  the config dir and are shared between sedshell processes.",
    version
)]
pub struct CLIArg {
    /// Log debug output to `sedshell.log` in the config dir
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Directory to store configuration and data
    /// (default: `$XDG_CONFIG_HOME/sedshell` or platform equivalent)
    #[arg(long, short = 'C', value_name = "PATH")]
    pub config_dir: Option<PathBuf>,
}

impl CLIArg {
    /// Logging is off unless `--debug` is passed.
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::OFF
        }
    }
}
