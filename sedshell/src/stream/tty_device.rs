// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The controlling terminal as a [`LineDevice`].
//!
//! Keystrokes are read in **cbreak** mode and lines are read in **cooked** mode:
//!
//! - [`LineDevice::read_char`] switches the tty to cbreak mode (no `ICANON`, no `ECHO`,
//!   `VMIN=1`, `VTIME=0`) just for the duration of the read, so a single key press is
//!   delivered immediately and isn't echoed. The original settings are restored by
//!   [`CbreakModeGuard`] when it is dropped, on every return path.
//! - [`LineSource::read_line`] leaves the tty alone, so prompts like `Command:` get the
//!   normal line editing and echo the user expects.
//!
//! `/dev/tty` is used (rather than stdin) because stdin is usually a pipe carrying the
//! lines being processed.

use std::{fs::File,
          io::{self, Read, Write},
          process::Stdio};

use rustix::{event::{self, PollFd, PollFlags, Timespec},
             termios::{self, LocalModes, OptionalActions, SpecialCodeIndex, Termios}};

use crate::{LineDevice, LineSource};

const DEV_TTY: &str = "/dev/tty";

#[derive(Debug)]
pub struct TtyDevice {
    file: File,
}

impl TtyDevice {
    /// Open the controlling terminal for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the process has no controlling terminal.
    pub fn try_open() -> io::Result<Self> {
        let file = File::options().read(true).write(true).open(DEV_TTY)?;
        Ok(Self { file })
    }

    fn has_pending_input(&self) -> io::Result<bool> {
        let mut fds = [PollFd::new(&self.file, PollFlags::IN)];
        let zero_timeout = Timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        let ready = event::poll(&mut fds, Some(&zero_timeout))?;
        Ok(ready > 0)
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0_u8; 1];
        loop {
            match self.file.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => return Err(error),
            }
        }
    }

    fn read_utf8_char(&mut self) -> io::Result<Option<char>> {
        decode_utf8_char(|| self.read_byte())
    }
}

/// Decode one (possibly multi byte) UTF-8 encoded character, pulling bytes from
/// `next_byte` until the width announced by the first byte is reached. A sequence that is
/// cut short or malformed decodes to `U+FFFD`. Returns `None` if there are no bytes at all.
///
/// # Errors
///
/// Returns an error if `next_byte` does.
pub fn decode_utf8_char(
    mut next_byte: impl FnMut() -> io::Result<Option<u8>>,
) -> io::Result<Option<char>> {
    let Some(first_byte) = next_byte()? else {
        return Ok(None);
    };

    let width = match first_byte {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    };

    let mut bytes = vec![first_byte];
    while bytes.len() < width {
        match next_byte()? {
            Some(byte) => bytes.push(byte),
            None => break,
        }
    }

    Ok(String::from_utf8_lossy(&bytes).chars().next())
}

/// Puts the tty in cbreak mode until dropped.
struct CbreakModeGuard<'a> {
    file: &'a File,
    original: Termios,
}

impl<'a> CbreakModeGuard<'a> {
    fn try_enable(file: &'a File) -> io::Result<Self> {
        let original = termios::tcgetattr(file)?;

        // rustix's Termios doesn't implement Copy, so we need to clone.
        let mut cbreak = original.clone();
        cbreak
            .local_modes
            .remove(LocalModes::ICANON | LocalModes::ECHO);
        cbreak.special_codes[SpecialCodeIndex::VMIN] = 1;
        cbreak.special_codes[SpecialCodeIndex::VTIME] = 0;
        termios::tcsetattr(file, OptionalActions::Now, &cbreak)?;

        Ok(Self { file, original })
    }
}

impl Drop for CbreakModeGuard<'_> {
    fn drop(&mut self) {
        if let Err(error) =
            termios::tcsetattr(self.file, OptionalActions::Drain, &self.original)
        {
            // % is Display, ? is Debug.
            tracing::error!(
                message = "Could not restore terminal settings",
                error = %error
            );
        }
    }
}

impl LineSource for TtyDevice {
    fn read_line(&mut self) -> io::Result<String> {
        let mut bytes = vec![];
        while let Some(byte) = self.read_byte()? {
            bytes.push(byte);
            if byte == b'\n' {
                break;
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl LineDevice for TtyDevice {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.file.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> { self.file.flush() }

    /// The handle is released when the device is dropped.
    fn close(&mut self) -> io::Result<()> { self.file.flush() }

    fn read_char(&mut self, wait_for_char: bool) -> io::Result<Option<char>> {
        let file = self.file.try_clone()?;
        let _guard = CbreakModeGuard::try_enable(&file)?;
        if !wait_for_char && !self.has_pending_input()? {
            return Ok(None);
        }
        self.read_utf8_char()
    }

    fn try_clone_as_stdin(&self) -> io::Result<Stdio> {
        Ok(Stdio::from(self.file.try_clone()?))
    }
}
