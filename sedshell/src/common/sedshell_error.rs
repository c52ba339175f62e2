// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Crate wide error type. See [`SedshellError`].

use std::path::PathBuf;

/// Convenience alias used by every fallible operation in this crate.
pub type SedshellResult<T> = Result<T, SedshellError>;

/// Everything that can go wrong while dispatching lines.
///
/// | Variant                 | Cause                                          | Fatal? |
/// | :---------------------- | :--------------------------------------------- | :----- |
/// | [`StoreIo`]             | `data.json` or its lock file can't be accessed | Yes    |
/// | [`MalformedStore`]      | `data.json` exists but isn't valid JSON        | Yes    |
/// | [`InvalidRegex`]        | Pattern typed at the `Regex:` prompt is bad    | No     |
/// | [`CommandSpawn`]        | `sh` (or `$SHELL`) could not be started        | Yes    |
/// | [`TerminalIo`]          | Reading or writing the terminal / input failed | Yes    |
/// | [`ConfigFolder`]        | The configuration folder can't be created      | Yes    |
///
/// [`StoreIo`]: Self::StoreIo
/// [`MalformedStore`]: Self::MalformedStore
/// [`InvalidRegex`]: Self::InvalidRegex
/// [`CommandSpawn`]: Self::CommandSpawn
/// [`TerminalIo`]: Self::TerminalIo
/// [`ConfigFolder`]: Self::ConfigFolder
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SedshellError {
    #[error("Could not access keybinding store file {path}")]
    #[diagnostic(
        code(sedshell::store::io),
        help("Check that the config directory exists and is writable")
    )]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Keybinding store file {path} does not contain valid JSON")]
    #[diagnostic(
        code(sedshell::store::malformed),
        help("Fix or delete the file; it is recreated when a key is next saved")
    )]
    MalformedStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid regular expression {pattern:?}")]
    #[diagnostic(code(sedshell::command::invalid_regex))]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Could not run command {command:?}")]
    #[diagnostic(
        code(sedshell::command::spawn),
        help("Make sure `sh` (and `$SHELL` for interactive shells) is on the PATH")
    )]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Terminal or input stream I/O failed")]
    #[diagnostic(code(sedshell::stream::io))]
    TerminalIo(#[from] std::io::Error),

    #[error("Could not create config folder {path}")]
    #[diagnostic(
        code(sedshell::config::folder),
        help("Pass a writable folder with --config-dir")
    )]
    ConfigFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine the user's config folder")]
    #[diagnostic(
        code(sedshell::config::no_home),
        help("Pass a folder explicitly with --config-dir")
    )]
    ConfigFolderNotAccessible,
}
