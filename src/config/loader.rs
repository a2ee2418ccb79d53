// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{MesarunError, Result};

/// Read and deserialize a run file without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| MesarunError::file(path, e))?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Read, deserialize and validate a run file.
///
/// A relative `[run].dir` is resolved against the run file's directory so
/// the file can be used from anywhere.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let mut raw_config = load_from_path(path)?;

    if raw_config.run.dir.is_relative() {
        raw_config.run.dir = config_root_dir(path).join(&raw_config.run.dir);
    }

    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Directory holding the run file (`.` for a bare file name).
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
