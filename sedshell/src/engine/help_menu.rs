// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{KeybindingStore, LineDevice, SedshellResult, render_builtin_menu};

/// Built in keys first, then the user's saved bindings.
///
/// ```text
///
/// C-d - Exit
/// SPACE - Skip this line
/// ...
/// ^ - Repeat the last command
///
///
/// c - ! git blame
/// ```
///
/// # Errors
///
/// Returns an error if the terminal can't be written, or the keybinding store can't be
/// read.
pub fn write_help_menu(
    store: &KeybindingStore,
    terminal: &mut dyn LineDevice,
) -> SedshellResult<()> {
    terminal.write_str(&render_builtin_menu())?;
    terminal.write_str(&store.describe_all()?)?;
    terminal.flush()?;
    Ok(())
}
