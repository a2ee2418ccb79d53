// src/project.rs

//! Checks on the project directory a run targets.

use std::path::Path;

use crate::errors::{MesarunError, Result};

/// Fail with [`MesarunError::ProjectNotFound`] unless `exists`.
pub fn check_exists(exists: bool, project_name: &str) -> Result<()> {
    if exists {
        Ok(())
    } else {
        Err(MesarunError::ProjectNotFound(project_name.to_string()))
    }
}

/// Make sure `dir` is an existing directory before anything is launched in
/// it.
pub fn ensure_project_dir(dir: &Path) -> Result<()> {
    check_exists(dir.is_dir(), &dir.display().to_string())
}
