//! Standard input and output as an engine [`Terminal`].

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
    tty::IsTty,
};
use hamlet_core::Terminal;
use std::io::{self, BufRead, Stdin, Stdout, Write};

pub struct ConsoleTerminal {
    stdin: Stdin,
    stdout: Stdout,
    /// Never emit escape codes; screens are separated by a blank line.
    plain: bool,
}

impl ConsoleTerminal {
    /// Plain mode is forced when stdout is not a terminal.
    pub fn new(plain: bool) -> Self {
        let stdout = io::stdout();
        let plain = plain || !stdout.is_tty();
        Self {
            stdin: io::stdin(),
            stdout,
            plain,
        }
    }
}

impl Terminal for ConsoleTerminal {
    fn clear(&mut self) -> io::Result<()> {
        if self.plain {
            return writeln!(self.stdout);
        }
        execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.stdout, "{line}")
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.stdout, "{text}")?;
        self.stdout.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
