// src/namelist/gyre.rs

//! Preparing a GYRE namelist before a pulsation run.
//!
//! GYRE reads everything from its namelist (`gyre.in` by default), so each
//! run needs the input model, its format and the output file names written
//! into it. When several GYRE runs share a directory in a parallel batch,
//! each gets a private copy of the namelist so they don't overwrite each
//! other's settings.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::errors::{MesarunError, Result};
use crate::exec::CommandSpec;
use crate::namelist::patch::patch_parameter;
use crate::types::{DataFormat, RunMode};

pub const DEFAULT_NAMELIST: &str = "gyre.in";
pub const DEFAULT_COMPLETION_LOG: &str = "gyre.log";
pub const NONAD_SUMMARY_FILE: &str = "freq_output_nonad.txt";

/// Everything needed to point a GYRE namelist at one stellar model.
///
/// Relative paths resolve against the run's working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct GyreContext {
    pub enabled: bool,
    /// Model file GYRE should read, e.g. `profile12.data.GYRE`.
    pub target_file: String,
    pub data_format: DataFormat,
    pub namelist: PathBuf,
    /// Shared log that parallel runs append a completion note to.
    pub completion_log: PathBuf,
}

impl GyreContext {
    pub fn new(target_file: impl Into<String>, data_format: DataFormat) -> Self {
        Self {
            enabled: true,
            target_file: target_file.into(),
            data_format,
            namelist: PathBuf::from(DEFAULT_NAMELIST),
            completion_log: PathBuf::from(DEFAULT_COMPLETION_LOG),
        }
    }

    /// Target file name up to its first `.` (`"12.data.GYRE"` -> `"12"`).
    pub fn target_stem(&self) -> &str {
        self.target_file
            .split('.')
            .next()
            .unwrap_or(&self.target_file)
    }

    /// The five `(section, parameter, value)` edits a run needs.
    pub fn parameters(&self) -> [(&'static str, &'static str, String); 5] {
        [
            ("&model", "model_type", "'EVOL'".to_string()),
            (
                "&model",
                "file_format",
                format!("'{}'", self.data_format.file_format()),
            ),
            ("&model", "file", format!("'{}'", self.target_file)),
            (
                "&ad_output",
                "summary_file",
                format!("'{}-freqs.dat'", self.target_stem()),
            ),
            (
                "&nad_output",
                "summary_file",
                format!("'{NONAD_SUMMARY_FILE}'"),
            ),
        ]
    }
}

/// Namelist and command a GYRE run will actually use.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedGyre {
    /// Absolute (or `dir`-joined) namelist path that was patched.
    pub namelist: PathBuf,
    /// True if `namelist` is a per-task copy to delete after the run.
    pub scratch: bool,
    pub command: CommandSpec,
}

/// Write the run's parameters into the namelist, copying it first when the
/// run is part of a parallel batch.
pub fn prepare(
    dir: &Path,
    ctx: &GyreContext,
    mode: RunMode,
    command: &CommandSpec,
) -> Result<PreparedGyre> {
    let source = dir.join(&ctx.namelist);

    let prepared = if mode.is_parallel() {
        let copy_name = format!("gyre{}.in", ctx.target_stem());
        let copy = dir.join(&copy_name);
        fs::copy(&source, &copy).map_err(|e| {
            // A readable source means the destination failed.
            let path = if source.is_file() { &copy } else { &source };
            MesarunError::file(path, e)
        })?;

        let default_name = ctx
            .namelist
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_NAMELIST.to_string());

        debug!(from = ?source, to = ?copy, "copied namelist for parallel run");
        PreparedGyre {
            namelist: copy,
            scratch: true,
            command: command.replace_all(&default_name, &copy_name),
        }
    } else {
        PreparedGyre {
            namelist: source,
            scratch: false,
            command: command.clone(),
        }
    };

    if let Err(e) = modify_gyre_params(dir, &prepared.namelist, ctx) {
        discard_scratch(&prepared);
        return Err(e);
    }
    Ok(prepared)
}

/// Apply the five GYRE edits to `namelist`, in order.
pub fn modify_gyre_params(dir: &Path, namelist: &Path, ctx: &GyreContext) -> Result<()> {
    for (section, parameter, value) in ctx.parameters() {
        patch_parameter(dir, namelist, parameter, &value, section)?;
    }
    info!(
        namelist = ?namelist,
        target = %ctx.target_file,
        format = ctx.data_format.file_format(),
        "namelist prepared for GYRE"
    );
    Ok(())
}

/// Bookkeeping after a parallel GYRE run: remove the private namelist copy
/// and note completion in the shared log.
///
/// Neither step can change the run's verdict; failures are only warned about.
pub fn finish_parallel(dir: &Path, ctx: &GyreContext, prepared: &PreparedGyre) {
    discard_scratch(prepared);

    let log = dir.join(&ctx.completion_log);
    if let Err(e) = append_completion_note(&log, &ctx.target_file) {
        warn!(target = %ctx.target_file, error = %e, "failed to record GYRE completion");
    }
}

/// Delete the per-task namelist copy, if `prepared` made one.
pub fn discard_scratch(prepared: &PreparedGyre) {
    if !prepared.scratch {
        return;
    }
    if let Err(e) = fs::remove_file(&prepared.namelist) {
        warn!(
            namelist = ?prepared.namelist,
            error = %e,
            "failed to remove per-task namelist copy"
        );
    }
}

/// Append `Done with {target}.` as a single write so concurrent tasks never
/// interleave within a line.
fn append_completion_note(path: &Path, target: &str) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| MesarunError::file(path, e))?;
    let note = format!("Done with {target}.\n");
    file.write_all(note.as_bytes())
        .map_err(|e| MesarunError::file(path, e))?;
    Ok(())
}
