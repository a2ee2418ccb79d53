// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! A simulator that runs and fails is *not* an error: it is reported as a
//! [`crate::types::Verdict`]. Errors are reserved for things that stop a run
//! from happening at all (bad config, missing namelist, unlaunchable binary).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MesarunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("failed to launch '{program}' in {dir:?}: {source}")]
    Launch {
        program: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Project '{0}' does not exist. Please create it first.")]
    ProjectNotFound(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MesarunError {
    /// Attach a path to an IO error from a file operation.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MesarunError::File {
            path: path.into(),
            source,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, MesarunError>;
