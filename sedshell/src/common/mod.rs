// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Shared plumbing: errors, CLI args, config folder, and logging.

// Attach sources.
pub mod cli_arg;
pub mod config_folder;
pub mod logging;
pub mod sedshell_error;
pub mod ui_str;

// Re-export.
pub use cli_arg::*;
pub use logging::*;
pub use sedshell_error::*;
