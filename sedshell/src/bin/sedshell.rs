// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clap::Parser;
use sedshell::{CLIArg, DispatchContext, KeybindingStore, LineDevice, SedshellError,
               StdinSource, TtyDevice, config_folder, run_dispatch_loop,
               try_initialize_logging_global};
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:?}");
        process::exit(1);
    }
}

fn run() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();

    let config_folder_path = config_folder::try_create(cli_arg.config_dir.clone())?;
    try_initialize_logging_global(
        cli_arg.log_level(),
        &config_folder::get_log_file_path(&config_folder_path),
    )?;

    // Lines come from stdin, keystrokes from the controlling terminal, so input can be
    // piped in while the user still gets to choose what happens to each line.
    let mut input = StdinSource::new();
    let mut terminal = TtyDevice::try_open().map_err(SedshellError::from)?;
    let mut ctx = DispatchContext::with_shell(KeybindingStore::new(&config_folder_path));

    let exit_reason = run_dispatch_loop(&mut input, &mut terminal, &mut ctx)?;

    // % is Display, ? is Debug.
    tracing::debug!(message = "Dispatch loop ended", exit_reason = ?exit_reason);

    terminal.flush().map_err(SedshellError::from)?;
    terminal.close().map_err(SedshellError::from)?;

    Ok(())
}
