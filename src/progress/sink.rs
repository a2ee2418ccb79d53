// src/progress/sink.rs

use std::fmt::Debug;
use std::io::Write;

/// Receiver of live progress strings (e.g. `"Age: 123.400 years"`).
///
/// Only consulted for runs outside a parallel batch.
pub trait ProgressSink: Send + Sync + Debug {
    fn update(&self, status: &str);
}

/// Single-line status display on stderr, redrawn in place.
#[derive(Debug, Default)]
pub struct TerminalStatus;

impl TerminalStatus {
    pub fn new() -> Self {
        Self
    }

    /// Move past the status line so later output starts on a fresh line.
    pub fn finish(&self) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err);
    }
}

impl ProgressSink for TerminalStatus {
    fn update(&self, status: &str) {
        let mut err = std::io::stderr().lock();
        // \r + clear-line keeps the display to one row.
        let _ = write!(err, "\r\x1b[2KRunning.... {status}");
        let _ = err.flush();
    }
}
