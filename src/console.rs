//! Operator-facing terminal I/O.
//!
//! Prompts, progress lines and the final tally all go through [`Console`] so
//! the workflow can be driven by scripted input in tests.

use std::io::{self, BufRead, Write};

use tracing::warn;

pub trait Console {
    /// Print one line of operator output.
    fn say(&mut self, line: &str);

    /// Show `prompt` and read one line of input without its line ending.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;

    /// Show `prompt` and read one line of input without echoing it.
    fn ask_secret(&mut self, prompt: &str) -> io::Result<String>;
}

/// Console bound to the process's stdin and stdout.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for TerminalConsole {
    fn say(&mut self, line: &str) {
        emit_line(&mut io::stdout().lock(), line);
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{prompt}")?;
            stdout.flush()?;
        }

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "standard input closed before an answer was given",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}

/// Write one operator line; a write failure is logged and the line dropped.
fn emit_line<W: Write>(out: &mut W, line: &str) -> bool {
    match writeln!(out, "{line}") {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, line, "could not write operator output");
            false
        }
    }
}
