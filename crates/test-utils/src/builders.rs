#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// A GYRE namelist with all three sections the runner patches.
pub const GYRE_TEMPLATE: &str = "\
&constants
/

&model
    model_type = 'EVOL'
    file = 'spb.mesa'
    file_format = 'MESA'
/

&mode
    l = 1
/

&ad_output
    summary_file = 'summary.txt'
    summary_item_list = 'l,n_pg,freq'
/

&nad_output
    freq_units = 'UHZ'
/
";

/// Builder for a TOML run file, written next to the project directory.
pub struct RunFileBuilder {
    dir: PathBuf,
    command: String,
    log: Option<String>,
    silent: Option<bool>,
    gyre_files: Vec<String>,
    data_format: Option<String>,
    jobs: Option<usize>,
}

impl RunFileBuilder {
    pub fn new(dir: impl Into<PathBuf>, command: &str) -> Self {
        Self {
            dir: dir.into(),
            command: command.to_string(),
            log: None,
            silent: None,
            gyre_files: vec![],
            data_format: None,
            jobs: None,
        }
    }

    pub fn log(mut self, log: &str) -> Self {
        self.log = Some(log.to_string());
        self
    }

    pub fn silent(mut self, val: bool) -> Self {
        self.silent = Some(val);
        self
    }

    pub fn gyre_file(mut self, file: &str) -> Self {
        self.gyre_files.push(file.to_string());
        self
    }

    pub fn data_format(mut self, fmt: &str) -> Self {
        self.data_format = Some(fmt.to_string());
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn to_toml(&self) -> String {
        let mut out = String::from("[run]\n");
        out.push_str(&format!("dir = {:?}\n", self.dir.display().to_string()));
        out.push_str(&format!("command = {:?}\n", self.command));
        if let Some(log) = &self.log {
            out.push_str(&format!("log = {log:?}\n"));
        }
        if let Some(silent) = self.silent {
            out.push_str(&format!("silent = {silent}\n"));
        }

        if !self.gyre_files.is_empty() {
            out.push_str("\n[gyre]\n");
            if let Some(fmt) = &self.data_format {
                out.push_str(&format!("data_format = {fmt:?}\n"));
            }
            let files: Vec<String> = self.gyre_files.iter().map(|f| format!("{f:?}")).collect();
            out.push_str(&format!("files = [{}]\n", files.join(", ")));
        }

        if let Some(jobs) = self.jobs {
            out.push_str(&format!("\n[batch]\njobs = {jobs}\n"));
        }
        out
    }

    /// Write the run file to `path` and return it.
    pub fn write_to(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref().to_path_buf();
        fs::write(&path, self.to_toml()).expect("writing run file");
        path
    }
}

/// Write an executable `sh` script into `dir` and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("writing script");
    let mut perms = fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod script");
    path
}
