//! Line-based console I/O
//!
//! The interactive shell talks to the user only through [`Console`], so tests
//! can drive it with [`ScriptedConsole`] instead of a real terminal.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Prompting and printing for the interactive shell
pub trait Console {
    /// Shows `prompt` and reads one line without its line ending
    ///
    /// Returns `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Prints a message followed by a newline
    fn say(&mut self, message: &str);

    /// Reads a trimmed answer; end of input reads as an empty answer
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        Ok(self
            .read_line(prompt)?
            .map(|line| line.trim().to_string())
            .unwrap_or_default())
    }

    /// Asks a yes/no question where only `y` counts as yes
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        Ok(self.ask(prompt)?.eq_ignore_ascii_case("y"))
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        (**self).read_line(prompt)
    }

    fn say(&mut self, message: &str) {
        (**self).say(message)
    }
}

/// Console backed by stdin and stdout
pub struct Terminal {
    stdin: io::Stdin,
}

impl Terminal {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for Terminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string()))
    }

    fn say(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Console that replays queued input lines and records everything shown
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    transcript: String,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            transcript: String::new(),
        }
    }

    /// Prompts, echoed input and messages in the order they happened
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Number of input lines not yet consumed
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.transcript.push_str(prompt);
        let line = self.input.pop_front();
        if let Some(line) = &line {
            self.transcript.push_str(line);
        }
        self.transcript.push('\n');
        Ok(line)
    }

    fn say(&mut self, message: &str) {
        self.transcript.push_str(message);
        self.transcript.push('\n');
    }
}
