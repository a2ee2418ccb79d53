// src/namelist/patch.rs

//! In-place editing of Fortran-style namelist files.
//!
//! ```text
//! &model
//!     model_type = 'EVOL'
//!     file = 'old.GYRE'   ! comment
//! /
//! ```
//!
//! A section opens on any line containing its marker (e.g. `&model`) and
//! closes on the first line starting with `/`. Within the open section the
//! first line mentioning the parameter gets its value replaced; if the
//! section closes first, a new assignment is inserted right before the `/`.
//! Everything else is copied byte for byte.
//!
//! Both the section and the parameter are matched as *substrings*. A
//! parameter whose name is contained in an earlier key of the same section
//! (`file` vs `file_format`) hits that earlier line instead. GYRE templates
//! list `file` before `file_format`, so the injected keys land correctly, but
//! callers patching arbitrary keys should keep it in mind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{MesarunError, Result};

const INDENT: &str = "    ";

/// What a patch pass did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// An existing assignment had its value replaced.
    Changed,
    /// A new assignment was inserted before the section's closing `/`.
    Added,
    /// The section was never found, or never closed: nothing was written.
    Untouched,
}

/// Patch `parameter` in `section` of an in-memory namelist document.
///
/// Returns the new document and what happened. At most one line is edited
/// or inserted per call.
pub fn patch_document(
    document: &str,
    parameter: &str,
    value: &str,
    section: &str,
) -> (String, PatchOutcome) {
    let mut out = String::with_capacity(document.len() + parameter.len() + value.len() + 32);
    let mut inside = false;
    let mut outcome = PatchOutcome::Untouched;

    for line in document.split_inclusive('\n') {
        if line.contains(section) {
            inside = true;
        }

        if inside {
            if line.contains(parameter) {
                if let Some(eq) = line.find('=') {
                    out.push_str(&line[..=eq]);
                    out.push_str(&format!(" {value}    ! Changed"));
                    out.push_str(line_ending(line));
                    outcome = PatchOutcome::Changed;
                    inside = false;
                    continue;
                }
            }

            if line.starts_with('/') {
                out.push_str(&format!("{INDENT}{parameter} = {value}    ! Added\n"));
                out.push_str(line);
                outcome = PatchOutcome::Added;
                inside = false;
                continue;
            }
        }

        out.push_str(line);
    }

    (out, outcome)
}

/// Patch a namelist file on disk.
///
/// `file` is resolved against `base_dir` (an absolute `file` wins). The
/// whole file is read, patched and swapped in through a sibling temporary,
/// so readers never see a half-written namelist. IO errors carry the path
/// and are not retried.
pub fn patch_parameter(
    base_dir: &Path,
    file: &Path,
    parameter: &str,
    value: &str,
    section: &str,
) -> Result<PatchOutcome> {
    let path = base_dir.join(file);
    let document = fs::read_to_string(&path).map_err(|e| MesarunError::file(&path, e))?;

    let (patched, outcome) = patch_document(&document, parameter, value, section);

    if outcome == PatchOutcome::Untouched {
        debug!(path = ?path, section, parameter, "section not found or never closed; leaving file as-is");
    } else {
        replace_file(&path, patched.as_bytes())?;
        debug!(path = ?path, section, parameter, value, ?outcome, "patched namelist");
    }

    Ok(outcome)
}

fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = scratch_path(path);
    fs::write(&tmp, contents).map_err(|e| MesarunError::file(&tmp, e))?;

    // The swapped-in file keeps the original's mode bits.
    let permissions = fs::metadata(path).map(|m| m.permissions());
    if let Err(e) = permissions.and_then(|p| fs::set_permissions(&tmp, p)) {
        let _ = fs::remove_file(&tmp);
        return Err(MesarunError::file(path, e));
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(MesarunError::file(path, e));
    }
    Ok(())
}

fn scratch_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.mesarun-tmp"))
}
