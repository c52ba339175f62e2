// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Streams the dispatch loop reads from and writes to.
//!
//! - [`LineSource`] / [`LineDevice`]: the capability set (`write`, `flush`, `close`,
//!   `read_line`, `read_char`).
//! - [`BlockingPipe`] and [`DuplexChannel`]: in-memory implementation, used to simulate
//!   the terminal and stdin from another thread.
//! - [`TtyDevice`]: the controlling terminal.

// Private modules (hide internal structure).
mod blocking_pipe;
mod duplex_channel;
mod line_device;
#[cfg(unix)]
mod tty_device;

// Re-exports for flat public API.
pub use blocking_pipe::*;
pub use duplex_channel::*;
pub use line_device::*;
#[cfg(unix)]
pub use tty_device::*;
