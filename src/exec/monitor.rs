// src/exec/monitor.rs

//! Per-line scanning of simulator stdout.
//!
//! The monitor only looks at lines when the run is silent (nothing echoed)
//! and is not a GYRE run; GYRE output has no age column and never prints
//! the termination phrase. Its state is one sticky flag plus the last age
//! seen.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::progress::{ProgressSink, classify_line, format_age, is_termination_line};

#[derive(Debug)]
pub struct OutputMonitor {
    scan: bool,
    sink: Option<Arc<dyn ProgressSink>>,
    terminated: bool,
    last_age: Option<f64>,
}

impl OutputMonitor {
    /// - `scan`: whether lines are inspected at all.
    /// - `sink`: where formatted ages go; `None` in parallel batches.
    pub fn new(scan: bool, sink: Option<Arc<dyn ProgressSink>>) -> Self {
        Self {
            scan,
            sink,
            terminated: false,
            last_age: None,
        }
    }

    pub fn observe(&mut self, line: &str) {
        if !self.scan {
            return;
        }

        if is_termination_line(line) && !self.terminated {
            warn!(line = line.trim_end(), "simulator reported early termination");
            self.terminated = true;
        }

        if let Some(age) = classify_line(line) {
            self.last_age = Some(age);
            if let Some(sink) = &self.sink {
                let status = format_age(age);
                debug!(age, %status, "progress");
                sink.update(&status);
            }
        }
    }

    /// True once any line contained the termination phrase.
    pub fn terminated(&self) -> bool {
        self.terminated
    }

    pub fn last_age(&self) -> Option<f64> {
        self.last_age
    }
}
