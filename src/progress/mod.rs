// src/progress/mod.rs

//! Progress tracking for simulator output.
//!
//! - [`markers`] holds the static table of MESA timestep-limit keywords.
//! - [`classify`] decides whether a stdout line carries a model age and
//!   whether it announces early termination.
//! - [`format`] turns an age in years into a human readable status string.
//! - [`sink`] is where those strings go (a terminal status line in
//!   production, a recorder in tests).

pub mod classify;
pub mod format;
pub mod markers;
pub mod sink;

pub use classify::{classify_line, is_termination_line, TERMINATION_MARKER};
pub use format::format_age;
pub use markers::{is_progress_marker, progress_markers};
pub use sink::{ProgressSink, TerminalStatus};
