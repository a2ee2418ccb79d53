// src/exec/command.rs

//! Turning a configured command into a `tokio::process::Command`.
//!
//! Commands are never handed to a shell: a command line is split into argv
//! by `shlex` and executed directly.

use std::fmt;
use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;

use crate::errors::{MesarunError, Result};

/// Program plus arguments, either as one line or pre-split.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Line(String),
    Argv(Vec<String>),
}

impl CommandSpec {
    /// The argv this command runs as.
    pub fn argv(&self) -> Result<Vec<String>> {
        let argv = match self {
            CommandSpec::Line(line) => split_command_line(line)?,
            CommandSpec::Argv(argv) => argv.clone(),
        };
        if argv.is_empty() {
            return Err(MesarunError::ConfigError("empty command".to_string()));
        }
        Ok(argv)
    }

    /// Replace every occurrence of `from` with `to` (in every argument for
    /// the argv form).
    pub fn replace_all(&self, from: &str, to: &str) -> CommandSpec {
        match self {
            CommandSpec::Line(line) => CommandSpec::Line(line.replace(from, to)),
            CommandSpec::Argv(argv) => {
                CommandSpec::Argv(argv.iter().map(|a| a.replace(from, to)).collect())
            }
        }
    }

    /// Build the child command: rooted at `dir`, stdout/stderr piped, stdin
    /// closed, killed if the handle is dropped.
    pub fn to_command(&self, dir: &Path) -> Result<Command> {
        let argv = self.argv()?;
        let (program, args) = argv.split_first().ok_or_else(|| {
            MesarunError::ConfigError("empty command".to_string())
        })?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        Ok(cmd)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSpec::Line(line) => f.write_str(line),
            CommandSpec::Argv(argv) => f.write_str(&argv.join(" ")),
        }
    }
}

impl From<&str> for CommandSpec {
    fn from(line: &str) -> Self {
        CommandSpec::Line(line.to_string())
    }
}

impl From<Vec<String>> for CommandSpec {
    fn from(argv: Vec<String>) -> Self {
        CommandSpec::Argv(argv)
    }
}

/// Split a command line into words with POSIX shell quoting rules.
///
/// No variable or glob expansion happens.
pub fn split_command_line(line: &str) -> Result<Vec<String>> {
    shlex::split(line).ok_or_else(|| {
        MesarunError::ConfigError(format!("unbalanced quotes or trailing escape in command: {line}"))
    })
}
