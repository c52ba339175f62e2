// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Records that it was run, and with which arguments, so end to end tests can observe
//! what `sedshell` ran without looking at its output.
//!
//! ```text
//! sedshell-record-args <SEQ_FILE> <OUTPUT_FILE> [ARGS]...
//! ```
//!
//! Appends `\n` followed by the JSON record `["<contents of SEQ_FILE>", [ARGS...]]` to
//! `OUTPUT_FILE`. Tests write a new sequence id to `SEQ_FILE` before each step, and poll
//! the last record of `OUTPUT_FILE` until it carries that id.

use clap::Parser;
use miette::IntoDiagnostic;
use std::{fs, io::Write, path::PathBuf, process};

#[derive(Debug, Parser)]
#[command(name = "sedshell-record-args", about = "Record a sequence id and arguments")]
struct CLIArg {
    /// File holding the current sequence id
    seq_file: PathBuf,

    /// File the record is appended to
    output_file: PathBuf,

    /// Arguments to record
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:?}");
        process::exit(1);
    }
}

fn run() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();

    let seq = fs::read_to_string(&cli_arg.seq_file).into_diagnostic()?;
    let record = serde_json::to_string(&(seq, &cli_arg.args)).into_diagnostic()?;

    let mut output_file = fs::File::options()
        .create(true)
        .append(true)
        .open(&cli_arg.output_file)
        .into_diagnostic()?;
    write!(output_file, "\n{record}").into_diagnostic()?;

    Ok(())
}
