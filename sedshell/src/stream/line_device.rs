// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{self, BufRead},
          process::Stdio};

/// Anything lines can be read from. The dispatch loop reads its input through this, so
/// process stdin and an in-memory [`crate::DuplexChannel`] are interchangeable.
pub trait LineSource {
    /// Read up to and including the next `\n`.
    ///
    /// Returns the residual data (without a trailing `\n`) if the stream is closed in
    /// the middle of a line, and exactly `""` once the stream is drained and closed. The
    /// empty string is returned again on every later call.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device can't be read.
    fn read_line(&mut self) -> io::Result<String>;
}

/// The capability set the dispatch loop needs from the terminal. Implemented by the real
/// [`crate::TtyDevice`] and by the in-memory [`crate::DuplexChannel`] used in tests.
pub trait LineDevice: LineSource {
    /// Write `text` as one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device can't be written.
    fn write_str(&mut self, text: &str) -> io::Result<()>;

    /// # Errors
    ///
    /// Returns an error if the underlying device can't be flushed.
    fn flush(&mut self) -> io::Result<()>;

    /// Signal end of stream to the reader on the other side.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device can't be closed.
    fn close(&mut self) -> io::Result<()>;

    /// Read a single keystroke.
    ///
    /// When `wait_for_char` is `true` this blocks until a character is available.
    /// Otherwise it returns `Ok(None)` straight away if nothing is pending. `Ok(None)`
    /// is also returned once the stream is closed and drained.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device can't be read.
    fn read_char(&mut self, wait_for_char: bool) -> io::Result<Option<char>>;

    /// What a child process should use as its stdin when it needs to talk to this
    /// device (interactive shell, raw commands). In-memory devices have no file
    /// descriptor to hand over, so the default is [`Stdio::null`].
    ///
    /// # Errors
    ///
    /// Returns an error if the device handle can't be duplicated.
    fn try_clone_as_stdin(&self) -> io::Result<Stdio> { Ok(Stdio::null()) }
}

/// Process stdin as a [`LineSource`].
#[derive(Debug)]
pub struct StdinSource {
    stdin: io::Stdin,
}

impl Default for StdinSource {
    fn default() -> Self { Self { stdin: io::stdin() } }
}

impl StdinSource {
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl LineSource for StdinSource {
    fn read_line(&mut self) -> io::Result<String> { read_line_lossy(&mut self.stdin.lock()) }
}

/// Like [`BufRead::read_line`], but bytes that aren't valid UTF-8 are replaced with
/// `U+FFFD` instead of failing the read. Piped input (eg: file names) isn't always UTF-8.
///
/// # Errors
///
/// Returns an error if `reader` can't be read.
pub fn read_line_lossy(reader: &mut impl BufRead) -> io::Result<String> {
    let mut bytes = vec![];
    reader.read_until(b'\n', &mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_invalid_utf8_line_is_decoded_lossily() {
        let mut reader = Cursor::new(b"caf\xe9.jpg\nok.jpg\n".to_vec());

        assert_eq!(read_line_lossy(&mut reader).unwrap(), "caf\u{FFFD}.jpg\n");
        assert_eq!(read_line_lossy(&mut reader).unwrap(), "ok.jpg\n");
        assert_eq!(read_line_lossy(&mut reader).unwrap(), "");
    }

    #[test]
    fn test_residual_data_without_newline() {
        let mut reader = Cursor::new(b"tail".to_vec());

        assert_eq!(read_line_lossy(&mut reader).unwrap(), "tail");
        assert_eq!(read_line_lossy(&mut reader).unwrap(), "");
    }
}
