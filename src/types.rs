use std::fmt;

use serde::Deserialize;

/// Final outcome of one simulator run.
///
/// Nothing in between is observable: callers get this plus whatever ended up
/// in the run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failed(FailureReason),
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success)
    }
}

/// Why a run was judged a failure.
///
/// Both variants look the same to a caller that only asks
/// [`Verdict::is_success`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Non-zero exit status (or death by signal, reported as `-1`), or error
    /// text left over once the child was reaped.
    Exit { code: i32, stderr_tail: String },
    /// The simulator printed `terminated evolution:` at some point.
    TerminatedEarly,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Exit { code, stderr_tail } if stderr_tail.is_empty() => {
                write!(f, "process exited with code {code}")
            }
            FailureReason::Exit { code, stderr_tail } => {
                write!(f, "process exited with code {code}: {stderr_tail}")
            }
            FailureReason::TerminatedEarly => write!(f, "evolution terminated early"),
        }
    }
}

/// Stellar model format handed to GYRE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataFormat {
    /// MESA's native GYRE output (`.GYRE` profiles).
    Gyre,
    Fgong,
}

impl DataFormat {
    /// Literal written to `file_format` in the `&model` section.
    pub fn file_format(self) -> &'static str {
        match self {
            DataFormat::Gyre => "MESA",
            DataFormat::Fgong => "FGONG",
        }
    }
}

impl Default for DataFormat {
    fn default() -> Self {
        DataFormat::Fgong
    }
}

/// Whether a run is alone or one of several running side by side.
///
/// In a parallel batch the live status display is left alone and GYRE runs
/// get a private namelist copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Single,
    ParallelBatch,
}

impl RunMode {
    pub fn is_parallel(self) -> bool {
        matches!(self, RunMode::ParallelBatch)
    }
}
