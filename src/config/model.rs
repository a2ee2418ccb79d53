// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::exec::CommandSpec;
use crate::namelist::gyre::{DEFAULT_COMPLETION_LOG, DEFAULT_NAMELIST};
use crate::types::DataFormat;

/// A run file as read from TOML, before validation.
///
/// ```toml
/// [run]
/// dir = "work/12M_sun"
/// command = "./rn"
/// log = "run.log"
/// silent = true
///
/// [gyre]
/// enabled = true
/// namelist = "gyre.in"
/// data_format = "FGONG"
/// files = ["1.data.FGONG", "2.data.FGONG"]
///
/// [batch]
/// jobs = 4
/// ```
///
/// Use [`ConfigFile`] (via `TryFrom`) everywhere else.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub run: RunSection,

    #[serde(default)]
    pub gyre: Option<GyreSection>,

    #[serde(default)]
    pub batch: BatchSection,
}

/// Validated run file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub run: RunSection,
    pub gyre: Option<GyreSection>,
    pub batch: BatchSection,
}

impl ConfigFile {
    /// Construct without running validation. Only `validate.rs` should call
    /// this.
    pub(crate) fn new_unchecked(
        run: RunSection,
        gyre: Option<GyreSection>,
        batch: BatchSection,
    ) -> Self {
        Self { run, gyre, batch }
    }

    /// The GYRE section, if present and switched on.
    pub fn active_gyre(&self) -> Option<&GyreSection> {
        self.gyre.as_ref().filter(|g| g.enabled)
    }
}

/// `[run]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSection {
    /// Directory the simulator runs in.
    pub dir: PathBuf,

    /// Command line (`"./rn"`) or argv (`["./rn"]`).
    pub command: CommandSpec,

    /// Run log, relative to `dir` unless absolute.
    #[serde(default = "default_log")]
    pub log: PathBuf,

    /// When false, simulator stdout is echoed instead of summarised.
    #[serde(default = "default_silent")]
    pub silent: bool,
}

fn default_log() -> PathBuf {
    PathBuf::from("run.log")
}

fn default_silent() -> bool {
    true
}

/// `[gyre]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GyreSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_namelist")]
    pub namelist: PathBuf,

    #[serde(default)]
    pub data_format: DataFormat,

    #[serde(default = "default_completion_log")]
    pub completion_log: PathBuf,

    /// Model files to run GYRE on, one run each.
    #[serde(default)]
    pub files: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_namelist() -> PathBuf {
    PathBuf::from(DEFAULT_NAMELIST)
}

fn default_completion_log() -> PathBuf {
    PathBuf::from(DEFAULT_COMPLETION_LOG)
}

/// `[batch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchSection {
    /// Maximum concurrent runs. `1` runs everything in sequence with live
    /// progress; anything higher switches to parallel batch mode.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_jobs() -> usize {
    1
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
        }
    }
}
