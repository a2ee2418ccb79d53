// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{MesarunError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = MesarunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.run, raw.gyre, raw.batch))
    }
}

/// Run all checks on an already-parsed run file.
fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_command(cfg)?;
    validate_gyre(cfg)?;
    validate_batch(cfg)?;
    Ok(())
}

fn validate_command(cfg: &RawConfigFile) -> Result<()> {
    cfg.run.command.argv().map_err(|e| {
        MesarunError::ConfigError(format!("[run].command is not usable: {e}"))
    })?;
    Ok(())
}

fn validate_gyre(cfg: &RawConfigFile) -> Result<()> {
    let Some(gyre) = cfg.gyre.as_ref().filter(|g| g.enabled) else {
        return Ok(());
    };

    if gyre.files.is_empty() {
        return Err(MesarunError::ConfigError(
            "[gyre] is enabled but `files` is empty".to_string(),
        ));
    }

    for file in &gyre.files {
        if file.trim().is_empty() {
            return Err(MesarunError::ConfigError(
                "[gyre].files contains an empty file name".to_string(),
            ));
        }
    }

    // Namelist copies and summary files are named after the part before the
    // first '.', so two files sharing it would overwrite each other.
    let mut stems: Vec<&str> = gyre
        .files
        .iter()
        .map(|f| f.split('.').next().unwrap_or(f))
        .collect();
    stems.sort_unstable();
    if let Some(pair) = stems.windows(2).find(|w| w[0] == w[1]) {
        return Err(MesarunError::ConfigError(format!(
            "[gyre].files has several entries starting with '{}.'; their outputs would collide",
            pair[0]
        )));
    }

    Ok(())
}

fn validate_batch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.batch.jobs == 0 {
        return Err(MesarunError::ConfigError(
            "[batch].jobs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
