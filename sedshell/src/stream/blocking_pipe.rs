// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! An in-process, blocking, one way pipe of text.
//!
//! Writers append whole chunks; readers drain them either one character at a time
//! ([`BlockingPipe::read_char`]) or one line at a time ([`BlockingPipe::read_line`]).
//! Both kinds of read work on the same chunk list, so a keystroke read can be followed
//! by a line read and each sees exactly the bytes the other left behind.
//!
//! ```text
//! write("he")   write("llo\n12")        read_line()   read_char()  read_char()
//! ┌──────┐      ┌──────┬──────────┐     ┌──────┐      ┌───┐        ┌───┐
//! │ "he" │  ->  │ "he" │ "llo\n12"│ ->  │ "12" │  ->  │"2"│   ->   │   │
//! └──────┘      └──────┴──────────┘     └──────┘      └───┘        └───┘
//!                                       "hello\n"     '1'          '2'
//! ```
//!
//! [`BlockingPipe::close`] queues a [`Chunk::Close`] marker. Readers blocked waiting for
//! data wake up, drain whatever precedes the marker, and from then on every read reports
//! end of stream (`""` for lines, `None` for characters). The marker is never removed,
//! so end of stream is idempotent.

use std::{collections::VecDeque,
          fmt::{Debug, Formatter},
          sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError}};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Text(String),
    Close,
}

#[derive(Debug, Default)]
struct PipeState {
    chunks: VecDeque<Chunk>,
    closed: bool,
}

#[derive(Debug, Default)]
struct PipeShared {
    state: Mutex<PipeState>,
    data_available: Condvar,
}

/// You can safely clone this struct, since it only contains an [Arc]. Clones share the
/// same buffer, which is how a writer thread and a reader thread talk to each other.
#[derive(Clone, Default)]
pub struct BlockingPipe {
    shared: Arc<PipeShared>,
    name: Option<String>,
}

impl Debug for BlockingPipe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "<Pipe {name}>"),
            None => write!(f, "<Pipe {:p}>", Arc::as_ptr(&self.shared)),
        }
    }
}

impl BlockingPipe {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn new_named(name: impl Into<String>) -> Self {
        Self {
            shared: Arc::default(),
            name: Some(name.into()),
        }
    }

    /// The pipe state is never left half updated, so a panic in another thread holding
    /// the lock doesn't make the data unusable.
    fn lock_state(&self) -> MutexGuard<'_, PipeState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_for_data<'a>(
        &'a self,
        guard: MutexGuard<'a, PipeState>,
    ) -> MutexGuard<'a, PipeState> {
        self.shared
            .data_available
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `text` as one chunk and wake blocked readers. Writes after
    /// [`Self::close`] are dropped.
    pub fn write(&self, text: &str) {
        let mut state = self.lock_state();
        if state.closed {
            tracing::debug!(message = "Dropping write to closed pipe", pipe = ?self);
            return;
        }
        if !text.is_empty() {
            state.chunks.push_back(Chunk::Text(text.to_string()));
        }
        drop(state);
        self.shared.data_available.notify_all();
    }

    pub fn flush(&self) {}

    pub fn close(&self) {
        let mut state = self.lock_state();
        if !state.closed {
            state.closed = true;
            state.chunks.push_back(Chunk::Close);
        }
        drop(state);
        tracing::debug!(message = "Closed pipe", pipe = ?self);
        self.shared.data_available.notify_all();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool { self.lock_state().closed }

    /// Read exactly one character. See [`crate::LineDevice::read_char`].
    #[must_use]
    pub fn read_char(&self, wait_for_char: bool) -> Option<char> {
        let mut state = self.lock_state();
        loop {
            match state.chunks.pop_front() {
                Some(Chunk::Close) => {
                    state.chunks.push_front(Chunk::Close);
                    return None;
                }
                Some(Chunk::Text(text)) => {
                    let mut chars = text.chars();
                    let Some(first_char) = chars.next() else {
                        continue;
                    };
                    let rest = chars.as_str();
                    if !rest.is_empty() {
                        state.chunks.push_front(Chunk::Text(rest.to_string()));
                    }
                    tracing::debug!(message = "Read character", pipe = ?self, char = ?first_char);
                    return Some(first_char);
                }
                None if !wait_for_char => return None,
                // Woken up with nothing to read is fine; the loop re-checks.
                None => state = self.wait_for_data(state),
            }
        }
    }

    /// Read up to and including the next `\n`. See [`crate::LineSource::read_line`].
    #[must_use]
    pub fn read_line(&self) -> String {
        let mut line = String::new();
        let mut state = self.lock_state();
        loop {
            match state.chunks.pop_front() {
                Some(Chunk::Close) => {
                    state.chunks.push_front(Chunk::Close);
                    tracing::debug!(message = "Read line at close", pipe = ?self, line = ?line);
                    return line;
                }
                Some(Chunk::Text(text)) => match text.split_once('\n') {
                    Some((first, rest)) => {
                        if !rest.is_empty() {
                            state.chunks.push_front(Chunk::Text(rest.to_string()));
                        }
                        line.push_str(first);
                        line.push('\n');
                        tracing::debug!(message = "Read line", pipe = ?self, line = ?line);
                        return line;
                    }
                    None => line.push_str(&text),
                },
                None => {
                    tracing::debug!(message = "Waiting for more data", pipe = ?self);
                    state = self.wait_for_data(state);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{thread, time::Duration};
    use test_case::test_case;

    #[test]
    fn test_readline() {
        let pipe = BlockingPipe::new();
        pipe.write("one\ntwo\n");
        pipe.close();
        assert_eq!(pipe.read_line(), "one\n");
        assert_eq!(pipe.read_line(), "two\n");
        assert_eq!(pipe.read_line(), "");
    }

    #[test]
    fn test_readchar() {
        let pipe = BlockingPipe::new();
        pipe.write("12");
        assert_eq!(pipe.read_char(true), Some('1'));
        assert_eq!(pipe.read_char(true), Some('2'));

        pipe.write("3");
        pipe.write("4");

        assert_eq!(pipe.read_char(true), Some('3'));
        assert_eq!(pipe.read_char(true), Some('4'));
    }

    #[test_case(&["hello\n"] ; "single write")]
    #[test_case(&["he", "llo\n"] ; "split write")]
    #[test_case(&["h", "e", "l", "l", "o", "\n"] ; "one char per write")]
    fn test_readline_ignores_write_chunking(writes: &[&str]) {
        let pipe = BlockingPipe::new();
        for it in writes {
            pipe.write(it);
        }
        assert_eq!(pipe.read_line(), "hello\n");
    }

    #[test]
    fn test_char_then_line_share_buffer() {
        let pipe = BlockingPipe::new();
        pipe.write("!echo\nrest");
        assert_eq!(pipe.read_char(true), Some('!'));
        assert_eq!(pipe.read_line(), "echo\n");
        assert_eq!(pipe.read_char(true), Some('r'));
    }

    #[test]
    fn test_multibyte_char() {
        let pipe = BlockingPipe::new();
        pipe.write("é!");
        assert_eq!(pipe.read_char(true), Some('é'));
        assert_eq!(pipe.read_char(true), Some('!'));
    }

    #[test]
    fn test_close_with_residual_then_idempotent_eof() {
        let pipe = BlockingPipe::new();
        pipe.write("no newline");
        pipe.close();
        assert_eq!(pipe.read_line(), "no newline");
        assert_eq!(pipe.read_line(), "");
        assert_eq!(pipe.read_line(), "");
        assert_eq!(pipe.read_char(true), None);
    }

    #[test]
    fn test_write_after_close_is_dropped() {
        let pipe = BlockingPipe::new();
        pipe.close();
        pipe.write("late\n");
        assert!(pipe.is_closed());
        assert_eq!(pipe.read_line(), "");
    }

    #[test]
    fn test_non_blocking_read_char() {
        let pipe = BlockingPipe::new();
        assert_eq!(pipe.read_char(false), None);
        pipe.write("x");
        assert_eq!(pipe.read_char(false), Some('x'));
    }

    #[test]
    fn test_blocked_reader_woken_by_writer() {
        let pipe = BlockingPipe::new_named("writer thread");
        let writer = pipe.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            writer.write("wo");
            thread::sleep(Duration::from_millis(20));
            writer.write("rld\n");
        });
        assert_eq!(pipe.read_line(), "world\n");
        handle.join().unwrap();
    }

    #[test]
    fn test_blocked_reader_woken_by_close() {
        let pipe = BlockingPipe::new();
        let closer = pipe.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            closer.close();
        });
        assert_eq!(pipe.read_char(true), None);
        assert_eq!(pipe.read_line(), "");
        handle.join().unwrap();
    }

    #[test]
    fn test_many_writes_no_loss_no_duplicates() {
        let pipe = BlockingPipe::new();
        let writer = pipe.clone();
        let handle = thread::spawn(move || {
            for i in 0..200 {
                writer.write(&format!("{i}\n"));
            }
            writer.close();
        });
        let mut lines = vec![];
        loop {
            let line = pipe.read_line();
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        handle.join().unwrap();
        let expected: Vec<String> = (0..200).map(|i| format!("{i}\n")).collect();
        assert_eq!(lines, expected);
    }
}
