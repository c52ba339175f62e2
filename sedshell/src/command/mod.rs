// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! What can be done to a line. See [`Command`] for the variants, [`BuiltinCommand`] for
//! the keys that are always available, and [`CommandExecutor`] for how shell commands
//! are actually run.

// Private modules (hide internal structure).
mod builtin_command;
mod command_executor;
mod command_kind;
mod regex_filter;

// Re-exports for flat public API.
pub use builtin_command::*;
pub use command_executor::*;
pub use command_kind::*;
pub use regex_filter::*;
