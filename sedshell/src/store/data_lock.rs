// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Two layered locks guard `data.json`:
//!
//! 1. [`IN_PROCESS_LOCK`], a process wide [`Mutex`], so threads in this process take
//!    turns.
//! 2. An advisory `flock(2)` on `data.json.lck`, so cooperating `sedshell` processes
//!    sharing the config dir take turns.
//!
//! They are always acquired in that order, and released in reverse order by
//! [`DataLockGuard`] when it is dropped. There is no timeout: a holder that never
//! releases the lock (eg: a stopped process) blocks everyone else.

use std::{fs::File,
          path::{Path, PathBuf},
          sync::{Mutex, MutexGuard, PoisonError}};

use rustix::fs::{FlockOperation, flock};

use crate::{SedshellError, SedshellResult};

static IN_PROCESS_LOCK: Mutex<()> = Mutex::new(());

/// Holds both locks. Field order matters: fields drop in declaration order, so the file
/// lock is released before the in process mutex.
#[derive(Debug)]
pub struct DataLockGuard {
    lock_file: File,
    lock_file_path: PathBuf,
    _in_process: MutexGuard<'static, ()>,
}

/// `data.json` -> `data.json.lck`.
#[must_use]
pub fn get_lock_file_path(data_file_path: &Path) -> PathBuf {
    let mut lock_file_path = data_file_path.as_os_str().to_owned();
    lock_file_path.push(".lck");
    PathBuf::from(lock_file_path)
}

/// Block until both locks are held.
///
/// # Errors
///
/// Returns an error if the lock file can't be created or locked.
pub fn acquire(data_file_path: &Path) -> SedshellResult<DataLockGuard> {
    // Nothing is ever stored inside the mutex, so a poisoned one is still usable.
    let in_process = IN_PROCESS_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    let lock_file_path = get_lock_file_path(data_file_path);
    let to_store_error = |source: std::io::Error| SedshellError::StoreIo {
        path: lock_file_path.clone(),
        source,
    };

    let lock_file = File::options()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_file_path)
        .map_err(to_store_error)?;

    flock(&lock_file, FlockOperation::LockExclusive)
        .map_err(|errno| to_store_error(errno.into()))?;

    // % is Display, ? is Debug.
    tracing::debug!(message = "Acquired data lock", lock_file = %lock_file_path.display());

    Ok(DataLockGuard {
        lock_file,
        lock_file_path,
        _in_process: in_process,
    })
}

impl Drop for DataLockGuard {
    fn drop(&mut self) {
        // Closing the file also releases the lock; unlocking explicitly just makes the
        // release happen before the in process mutex is let go.
        if let Err(error) = flock(&self.lock_file, FlockOperation::Unlock) {
            tracing::error!(
                message = "Could not release data lock",
                lock_file = %self.lock_file_path.display(),
                error = %error
            );
        }
        tracing::debug!(
            message = "Released data lock",
            lock_file = %self.lock_file_path.display()
        );
    }
}
