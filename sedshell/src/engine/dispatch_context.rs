// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommandExecutor, HistoryEntry, KeybindingStore, ShellExecutor};

/// Everything commands share for the lifetime of one dispatch loop.
#[derive(Debug)]
pub struct DispatchContext {
    pub store: KeybindingStore,
    pub executor: Box<dyn CommandExecutor>,
    last_command: Option<HistoryEntry>,
}

impl DispatchContext {
    #[must_use]
    pub fn new(store: KeybindingStore, executor: Box<dyn CommandExecutor>) -> Self {
        Self {
            store,
            executor,
            last_command: None,
        }
    }

    /// Production setup: commands are run with [`ShellExecutor`].
    #[must_use]
    pub fn with_shell(store: KeybindingStore) -> Self {
        Self::new(store, Box::new(ShellExecutor::new()))
    }

    #[must_use]
    pub fn last_command(&self) -> Option<&HistoryEntry> { self.last_command.as_ref() }

    /// There is only ever one history slot; this replaces it.
    pub fn record_history(&mut self, entry: HistoryEntry) {
        // % is Display, ? is Debug.
        tracing::debug!(message = "Recording history", entry = ?entry);
        self.last_command = Some(entry);
    }
}
