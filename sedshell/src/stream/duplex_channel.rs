// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

use crate::{BlockingPipe, LineDevice, LineSource};

/// Two [`BlockingPipe`]s joined into a bidirectional channel. Use
/// [`DuplexChannel::new_pair`] to get both ends: what one end writes, the other end
/// reads.
///
/// ```text
///  end 0 (test side)                       end 1 (given to the dispatch loop)
///  ┌───────────────┐     pipe "end 2"      ┌───────────────┐
///  │ write ────────┼──────────────────────►│ read_*        │
///  │               │     pipe "end 1"      │               │
///  │ read_* ◄──────┼───────────────────────┼──────── write │
///  └───────────────┘                       └───────────────┘
/// ```
///
/// This is how tests stand in for the controlling terminal and for stdin.
#[derive(Debug, Clone)]
pub struct DuplexChannel {
    incoming: BlockingPipe,
    outgoing: BlockingPipe,
}

impl DuplexChannel {
    #[must_use]
    pub fn new(incoming: BlockingPipe, outgoing: BlockingPipe) -> Self {
        Self { incoming, outgoing }
    }

    /// Create both ends of a channel. `name` shows up in debug logs.
    #[must_use]
    pub fn new_pair(name: &str) -> (DuplexChannel, DuplexChannel) {
        let twin_1 = BlockingPipe::new_named(format!("{name} end 1"));
        let twin_2 = BlockingPipe::new_named(format!("{name} end 2"));
        (
            DuplexChannel::new(twin_1.clone(), twin_2.clone()),
            DuplexChannel::new(twin_2, twin_1),
        )
    }

    /// Convenience for the side that drives the channel in tests.
    pub fn send(&self, text: &str) { self.outgoing.write(text); }

    /// Close the direction this end writes to.
    pub fn close_outgoing(&self) { self.outgoing.close(); }
}

impl LineSource for DuplexChannel {
    fn read_line(&mut self) -> io::Result<String> { Ok(self.incoming.read_line()) }
}

impl LineDevice for DuplexChannel {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.outgoing.write(text);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.outgoing.flush();
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.outgoing.close();
        Ok(())
    }

    /// Always blocks, whatever `wait_for_char` says. Returns `None` only once the other
    /// end has closed and everything it sent has been read.
    fn read_char(&mut self, _wait_for_char: bool) -> io::Result<Option<char>> {
        Ok(self.incoming.read_char(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{thread, time::Duration};

    #[test]
    fn test_writes_cross_over() {
        let (mut end_0, mut end_1) = DuplexChannel::new_pair("terminal");

        end_0.write_str("from 0\n").unwrap();
        end_1.write_str("from 1\n").unwrap();

        assert_eq!(end_1.read_line().unwrap(), "from 0\n");
        assert_eq!(end_0.read_line().unwrap(), "from 1\n");
    }

    #[test]
    fn test_close_only_affects_one_direction() {
        let (mut end_0, mut end_1) = DuplexChannel::new_pair("stdin");

        end_0.send("last\n");
        end_0.close().unwrap();
        end_1.write_str("still open\n").unwrap();

        assert_eq!(end_1.read_line().unwrap(), "last\n");
        assert_eq!(end_1.read_line().unwrap(), "");
        assert_eq!(end_1.read_char(true).unwrap(), None);
        assert_eq!(end_0.read_line().unwrap(), "still open\n");
    }

    #[test]
    fn test_read_char_waits_even_when_not_asked_to() {
        let (end_0, mut end_1) = DuplexChannel::new_pair("terminal");

        let reader = thread::spawn(move || end_1.read_char(false).unwrap());
        thread::sleep(Duration::from_millis(20));
        assert!(!reader.is_finished());

        end_0.send("x");
        assert_eq!(reader.join().unwrap(), Some('x'));
    }

    #[test]
    fn test_read_char_after_close() {
        let (end_0, mut end_1) = DuplexChannel::new_pair("terminal");

        end_0.send("y");
        end_0.close_outgoing();

        assert_eq!(end_1.read_char(false).unwrap(), Some('y'));
        assert_eq!(end_1.read_char(false).unwrap(), None);
    }

    #[test]
    fn test_child_stdin_is_null() {
        let (_end_0, end_1) = DuplexChannel::new_pair("terminal");
        assert!(end_1.try_clone_as_stdin().is_ok());
    }
}
