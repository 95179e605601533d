//! The line-based terminal the engine draws to and reads from.
//!
//! Rendering details (colors, cursor control) belong to implementations; the
//! engine only needs to clear, write lines, prompt, and read a line.

use std::io;

/// Line-oriented input and screen output.
pub trait Terminal {
    /// Wipe the screen before a location redraws.
    fn clear(&mut self) -> io::Result<()>;

    /// Write one line of text.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Write a prompt without a trailing newline.
    fn prompt(&mut self, text: &str) -> io::Result<()>;

    /// Block until the player submits a line. `None` means input is closed.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}
