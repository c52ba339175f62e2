// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

//! # sedshell
//!
//! Interactive, interactively-extendable tool for doing things based on lines.
//!
//! `sedshell` reads lines from an input stream (stdin by default). Each line is shown on
//! the controlling terminal, and then a single keystroke selects what to do with it:
//!
//! | Key       | Action                                                          |
//! | :-------- | :-------------------------------------------------------------- |
//! | `!`       | Prompt for a shell command, run `<command> <line>`, next line   |
//! | `&`       | Same as `!`, but stay on the current line                       |
//! | `^`       | Repeat the last `!` or `&` command on the current line          |
//! | `>`       | Bind the last `!` or `&` command to a key (persisted)           |
//! | `<`       | Prompt for a command and run it with the terminal as stdin      |
//! | `$`       | Start an interactive shell                                      |
//! | `\`       | Skip lines while a regex matches                                |
//! | `/`       | Skip lines until a regex matches                                |
//! | `SPACE`   | Skip this line                                                  |
//! | `?`       | Show help                                                       |
//! | `C-d`     | Exit                                                            |
//!
//! Keys bound with `>` are stored in `<config-dir>/data.json` and take priority over the
//! built in keys. The file is shared safely between concurrently running `sedshell`
//! processes (see [`store`]).
//!
//! ## Usage
//!
//! ```bash
//! git ls-files | sedshell
//! sedshell --config-dir /tmp/sedshell-config < list-of-urls.txt
//! ```
//!
//! ## Architecture
//!
//! **Module structure:**
//! - `src/bin/sedshell.rs` - Binary entry point
//! - `src/bin/sedshell-record-args.rs` - Companion used by end to end tests
//! - `src/common/` - Errors, CLI args, config folder, logging
//! - `src/stream/` - [`LineDevice`] capability, in-memory [`BlockingPipe`] /
//!   [`DuplexChannel`], and the real [`TtyDevice`]
//! - `src/store/` - Persisted [`KeybindingStore`] with cross process locking
//! - `src/command/` - [`Command`] variants, built in keys, regex filters, executor seam
//! - `src/engine/` - The per line [`run_dispatch_loop`]

// Attach sources.
pub mod command;
pub mod common;
pub mod engine;
pub mod store;
pub mod stream;

// Re-export.
pub use command::*;
pub use common::*;
pub use engine::*;
pub use store::*;
pub use stream::*;
