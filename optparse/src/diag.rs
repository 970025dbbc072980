//! Where human-readable diagnostics go.
//!
//! Every parse takes a `&mut dyn Diagnostics`; the process streams are only
//! touched when the caller hands in [`Stderr`].

use std::io::Write;

pub trait Diagnostics {
    /// Receive one complete diagnostic line, without trailing newline.
    fn report(&mut self, line: &str);
}

/// Writes each line to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stderr;

impl Diagnostics for Stderr {
    fn report(&mut self, line: &str) {
        let stderr = std::io::stderr();
        let mut lock = stderr.lock();
        let _ = write!(lock, "{}\n", line);
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Diagnostics for Silent {
    fn report(&mut self, _line: &str) {}
}

impl Diagnostics for Vec<String> {
    fn report(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Forwards to an inner sink while keeping a copy of every line.
pub(crate) struct Recorder<'d> {
    inner: &'d mut dyn Diagnostics,
    pub(crate) lines: Vec<String>,
}

impl<'d> Recorder<'d> {
    pub(crate) fn new(inner: &'d mut dyn Diagnostics) -> Self {
        Recorder {
            inner,
            lines: Vec::new(),
        }
    }
}

impl Diagnostics for Recorder<'_> {
    fn report(&mut self, line: &str) {
        self.lines.push(line.to_string());
        self.inner.report(line);
    }
}
