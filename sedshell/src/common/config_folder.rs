// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Display, Formatter, Result},
          fs,
          path::{Path, PathBuf}};

use dirs::config_dir;

use crate::{SedshellError, SedshellResult};

#[derive(Debug, Clone, Copy)]
pub enum ConfigPaths {
    TopLevelFolderName,
    KeybindingStoreFile,
    LogFile,
}

impl Display for ConfigPaths {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let path = match self {
            ConfigPaths::TopLevelFolderName => "sedshell",
            ConfigPaths::KeybindingStoreFile => "data.json",
            ConfigPaths::LogFile => "sedshell.log",
        };
        write!(f, "{path}")
    }
}

/// This is where the keybindings are stored.
#[must_use]
pub fn get_store_file_path(config_folder: &Path) -> PathBuf {
    config_folder.join(ConfigPaths::KeybindingStoreFile.to_string())
}

/// This is where `--debug` output goes.
#[must_use]
pub fn get_log_file_path(config_folder: &Path) -> PathBuf {
    config_folder.join(ConfigPaths::LogFile.to_string())
}

/// This is where the config folder is, unless `--config-dir` says otherwise.
#[must_use]
pub fn try_get_default_config_folder_path() -> Option<PathBuf> {
    let home_config_folder_path = config_dir()?;
    Some(home_config_folder_path.join(ConfigPaths::TopLevelFolderName.to_string()))
}

/// Resolve the config folder (explicit path wins over the default one) and make sure it
/// exists.
///
/// # Errors
///
/// Returns an error if:
/// - No explicit path was given and the platform config folder can't be determined
/// - The folder can't be created
pub fn try_create(maybe_config_folder: Option<PathBuf>) -> SedshellResult<PathBuf> {
    let config_folder_path = match maybe_config_folder {
        Some(path) => path,
        None => try_get_default_config_folder_path()
            .ok_or(SedshellError::ConfigFolderNotAccessible)?,
    };

    match fs::create_dir_all(&config_folder_path) {
        Ok(()) => {
            // % is Display, ? is Debug.
            tracing::debug!(
                message = "Config folder is ready.",
                config_folder = ?config_folder_path
            );
            Ok(config_folder_path)
        }
        Err(source) => {
            tracing::error!(
                message = "Could not create config folder.",
                error = ?source
            );
            Err(SedshellError::ConfigFolder {
                path: config_folder_path,
                source,
            })
        }
    }
}
