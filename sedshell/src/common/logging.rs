// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! File based logging. The terminal is the interactive device, so log output never goes
//! to stdout or stderr.

use std::path::Path;

use tracing_core::LevelFilter;

/// Note that if you wrap this up in a non blocking writer, events logged right before
/// the process exits (eg: after `C-d`) can be lost, so the plain appender is used.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no parent directory
/// - The path has no file name
pub fn try_create_file_appender(
    path: &Path,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let parent = path.parent().ok_or_else(|| {
        miette::miette!(
            "Can't access folder of {}. It might not exist, or don't have required permissions.",
            path.display()
        )
    })?;

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't access file name {}. It might not exist, or don't have required permissions.",
            path.display()
        )
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}

/// Install the global tracing subscriber.
///
/// Logging is **DISABLED** by **default**. Passing [`LevelFilter::OFF`] is a no-op, so
/// the [`tracing::debug!`] calls throughout the crate cost nothing in normal use.
///
/// # Errors
///
/// Returns an error if the log file can't be set up, or a global subscriber is already
/// installed.
pub fn try_initialize_logging_global(
    level_filter: LevelFilter,
    log_file_path: &Path,
) -> miette::Result<()> {
    // Early return if the level filter is off.
    if level_filter == LevelFilter::OFF {
        return Ok(());
    }

    let file_appender = try_create_file_appender(log_file_path)?;

    tracing_subscriber::fmt()
        .with_writer(file_appender)
        .with_max_level(level_filter)
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|error| miette::miette!("Could not install tracing subscriber: {error}"))?;

    // % is Display, ? is Debug.
    tracing::debug!(
        message = "Start logging...",
        log_file = %log_file_path.display()
    );

    Ok(())
}
