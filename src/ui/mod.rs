//! Status presentation layer
//!
//! All user-facing status goes through the [`StatusReporter`] trait so the
//! generate operation can stay silent when stdout carries the object stream.

use std::io::Write;

use console::Style;

/// Reports progress of a generation run
pub trait StatusReporter {
    /// A step is starting
    fn step(&mut self, message: &str);

    /// A non-fatal condition the user should know about
    fn notice(&mut self, message: &str);

    /// The run finished
    fn success(&mut self, message: &str);
}

/// Styled status lines written to a terminal sink
pub struct ConsoleReporter<W: Write> {
    sink: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    fn line(&mut self, prefix: &str, style: &Style, message: &str) {
        let _ = writeln!(self.sink, "{} {}", style.apply_to(prefix), message);
    }
}

impl<W: Write> StatusReporter for ConsoleReporter<W> {
    fn step(&mut self, message: &str) {
        self.line("INFO", &Style::new().bold().cyan(), message);
    }

    fn notice(&mut self, message: &str) {
        self.line("INFO", &Style::new().bold().yellow(), message);
    }

    fn success(&mut self, message: &str) {
        self.line("INFO", &Style::new().bold().green(), message);
    }
}

/// Reporter for `--quiet` and stream output
pub struct SilentReporter;

impl StatusReporter for SilentReporter {
    fn step(&mut self, _message: &str) {}

    fn notice(&mut self, _message: &str) {}

    fn success(&mut self, _message: &str) {}
}
