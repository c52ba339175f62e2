// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Persisted keybindings in `<config-dir>/data.json`.

// Attach sources.
pub mod binding_document;
pub mod data_lock;
pub mod keybinding_store;

// Re-export.
pub use binding_document::*;
pub use keybinding_store::*;
