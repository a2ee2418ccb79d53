// src/exec/runner.rs

//! Running one simulator process to completion.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{MesarunError, Result};
use crate::exec::command::CommandSpec;
use crate::exec::monitor::OutputMonitor;
use crate::namelist::gyre::{self, GyreContext, PreparedGyre};
use crate::progress::ProgressSink;
use crate::types::{FailureReason, RunMode, Verdict};

/// Written to the log after every run.
pub const LOG_SEPARATOR_WIDTH: usize = 100;

/// stderr lines kept for [`FailureReason::Exit`].
const STDERR_TAIL_LINES: usize = 20;

/// One simulator invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub command: CommandSpec,
    pub working_directory: PathBuf,
    /// When false, stdout is echoed to the terminal and not scanned.
    pub silent: bool,
    /// Append-mode run log; relative paths resolve against
    /// `working_directory`.
    pub log_path: PathBuf,
    pub progress_sink: Option<Arc<dyn ProgressSink>>,
    pub gyre: Option<GyreContext>,
    pub mode: RunMode,
}

impl RunRequest {
    pub fn new(
        command: impl Into<CommandSpec>,
        working_directory: impl Into<PathBuf>,
        log_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            command: command.into(),
            working_directory: working_directory.into(),
            silent: true,
            log_path: log_path.into(),
            progress_sink: None,
            gyre: None,
            mode: RunMode::Single,
        }
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress_sink = Some(sink);
        self
    }

    pub fn with_gyre(mut self, ctx: GyreContext) -> Self {
        self.gyre = Some(ctx);
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn resolved_log_path(&self) -> PathBuf {
        self.working_directory.join(&self.log_path)
    }

    fn active_gyre(&self) -> Option<&GyreContext> {
        self.gyre.as_ref().filter(|ctx| ctx.enabled)
    }
}

/// Runs simulator processes: tees their output into the run log, watches
/// it for progress and early termination, and turns the result into a
/// [`Verdict`].
///
/// A run blocks its caller until the child exits; there is no timeout.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run `request` to completion.
    ///
    /// `Err` means the run never happened properly (namelist or log not
    /// writable, binary not launchable); a simulator that ran and failed is
    /// `Ok(Verdict::Failed(..))`.
    pub async fn run(&self, request: &RunRequest) -> Result<Verdict> {
        let dir = request.working_directory.clone();

        let prepared = match request.active_gyre().cloned() {
            Some(ctx) => {
                let (mode, command) = (request.mode, request.command.clone());
                let dir = dir.clone();
                let prepared = blocking("preparing GYRE namelist", move || {
                    gyre::prepare(&dir, &ctx, mode, &command)
                })
                .await??;
                Some(prepared)
            }
            None => None,
        };

        let outcome = self.run_prepared(request, prepared.as_ref()).await;

        if let (Some(ctx), Some(prepared)) = (request.active_gyre().cloned(), prepared) {
            if request.mode.is_parallel() {
                let succeeded = outcome.is_ok();
                let cleanup = blocking("cleaning up parallel GYRE run", move || {
                    if succeeded {
                        gyre::finish_parallel(&dir, &ctx, &prepared);
                    } else {
                        gyre::discard_scratch(&prepared);
                    }
                })
                .await;
                if let Err(e) = cleanup {
                    warn!(error = %e, "parallel GYRE cleanup did not run");
                }
            }
        }

        outcome
    }

    async fn run_prepared(
        &self,
        request: &RunRequest,
        prepared: Option<&PreparedGyre>,
    ) -> Result<Verdict> {
        let dir = request.working_directory.as_path();
        let command = prepared.map_or(&request.command, |p| &p.command);
        let is_gyre = prepared.is_some();

        let log_path = request.resolved_log_path();
        let mut log = open_log(&log_path).await?;

        let mut cmd = command.to_command(dir)?;
        info!(dir = ?dir, cmd = %command, gyre = is_gyre, "starting simulator process");

        let mut child = cmd.spawn().map_err(|source| MesarunError::Launch {
            program: command.to_string(),
            dir: dir.to_path_buf(),
            source,
        })?;

        let stdout = child.stdout.take();
        let stderr_task = child.stderr.take().map(collect_lines);

        let sink = if request.mode.is_parallel() {
            None
        } else {
            request.progress_sink.clone()
        };
        let mut monitor = OutputMonitor::new(!is_gyre, sink);

        if let Some(stdout) = stdout {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                let n = reader
                    .read_until(b'\n', &mut buf)
                    .await
                    .context("reading simulator stdout")?;
                if n == 0 {
                    break;
                }

                write_log(&mut log, &log_path, &buf).await?;

                if !request.silent {
                    echo(&buf).await;
                } else {
                    monitor.observe(&String::from_utf8_lossy(&buf));
                }
            }
        }
        debug!(dir = ?dir, "simulator stdout closed");

        let (stderr_lines, leftover_error) = match stderr_task {
            Some(task) => match task.await {
                Ok(Ok(lines)) => (lines, String::new()),
                Ok(Err(e)) => (Vec::new(), format!("reading simulator stderr: {e}")),
                Err(e) => (Vec::new(), format!("stderr reader task failed: {e}")),
            },
            None => (Vec::new(), String::new()),
        };

        for line in &stderr_lines {
            write_log(&mut log, &log_path, line).await?;
            echo(line).await;
        }

        let separator = format!("\n\n{}\n\n", "*".repeat(LOG_SEPARATOR_WIDTH));
        write_log(&mut log, &log_path, separator.as_bytes()).await?;

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for simulator in {dir:?}"))?;
        let code = status.code().unwrap_or(-1);

        info!(
            dir = ?dir,
            exit_code = code,
            success = status.success(),
            terminated = monitor.terminated(),
            last_age = monitor.last_age(),
            "simulator process exited"
        );

        let verdict = if !status.success() || !leftover_error.is_empty() {
            let stderr_tail = if leftover_error.is_empty() {
                tail(&stderr_lines, STDERR_TAIL_LINES)
            } else {
                leftover_error
            };
            warn!(exit_code = code, stderr = %stderr_tail, "the process raised an error");
            Verdict::Failed(FailureReason::Exit { code, stderr_tail })
        } else if monitor.terminated() {
            Verdict::Failed(FailureReason::TerminatedEarly)
        } else {
            Verdict::Success
        };

        Ok(verdict)
    }
}

async fn open_log(path: &Path) -> Result<File> {
    tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| MesarunError::file(path, e))
}

/// Append and flush, so a crash never loses output already produced.
async fn write_log(log: &mut File, path: &Path, bytes: &[u8]) -> Result<()> {
    log.write_all(bytes)
        .await
        .map_err(|e| MesarunError::file(path, e))?;
    log.flush().await.map_err(|e| MesarunError::file(path, e))
}

async fn echo(bytes: &[u8]) {
    let mut out = tokio::io::stdout();
    let _ = out.write_all(bytes).await;
    let _ = out.flush().await;
}

/// Drain a pipe line by line in the background so the child never blocks
/// on a full stderr buffer while stdout is still being read.
fn collect_lines<R>(pipe: R) -> JoinHandle<std::io::Result<Vec<Vec<u8>>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(pipe);
        let mut lines = Vec::new();
        loop {
            let mut line = Vec::new();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }
            lines.push(line);
        }
        Ok(lines)
    })
}

fn tail(lines: &[Vec<u8>], n: usize) -> String {
    let start = lines.len().saturating_sub(n);
    lines[start..]
        .iter()
        .map(|l| String::from_utf8_lossy(l))
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Run synchronous file work off the async worker threads.
async fn blocking<T, F>(what: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let value = tokio::task::spawn_blocking(f).await.context(what)?;
    Ok(value)
}
