// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The per line dispatch loop and the state it carries between lines.

// Private modules (hide internal structure).
mod dispatch_context;
mod dispatch_loop;
mod help_menu;

// Re-exports for flat public API.
pub use dispatch_context::*;
pub use dispatch_loop::*;
pub use help_menu::*;
