// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod namelist;
pub mod progress;
pub mod project;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_and_validate;
use crate::exec::{ProcessRunner, RunBackend, RunRequest, run_batch};
use crate::namelist::GyreContext;
use crate::progress::{ProgressSink, TerminalStatus};
use crate::types::Verdict;

/// How many runs of an invocation succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, verdict: &Verdict) {
        if verdict.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - run file loading and CLI overrides
/// - the project directory check
/// - one [`RunRequest`] per simulator invocation
/// - sequential runs with a live status line, or a parallel batch
pub async fn run(args: CliArgs) -> Result<RunSummary> {
    let config_path = PathBuf::from(&args.config);
    let mut cfg = load_and_validate(&config_path)?;

    if args.verbose {
        cfg.run.silent = false;
    }
    if let Some(jobs) = args.jobs {
        cfg.batch.jobs = jobs.max(1);
    }

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(RunSummary::default());
    }

    project::ensure_project_dir(&cfg.run.dir)?;

    let requests = build_requests(&cfg);
    let mut summary = RunSummary::default();

    if cfg.batch.jobs > 1 && requests.len() > 1 {
        let backend: Arc<dyn RunBackend> = Arc::new(ProcessRunner::new());
        for result in run_batch(backend, requests, cfg.batch.jobs).await {
            match result.outcome {
                Ok(verdict) => summary.record(&verdict),
                Err(e) => {
                    warn!(label = %result.label, error = %e, "run could not complete");
                    summary.failed += 1;
                }
            }
        }
    } else {
        let runner = ProcessRunner::new();
        let status = Arc::new(TerminalStatus::new());
        for request in requests {
            let request = if request.silent {
                request.with_progress_sink(Arc::clone(&status) as Arc<dyn ProgressSink>)
            } else {
                request
            };
            let verdict = runner.run(&request).await;
            if request.silent {
                status.finish();
            }
            let verdict = verdict?;
            report(&request, &verdict);
            summary.record(&verdict);
        }
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "all runs finished"
    );
    Ok(summary)
}

/// One request per GYRE target file, or a single plain run.
pub fn build_requests(cfg: &ConfigFile) -> Vec<RunRequest> {
    let base = RunRequest::new(
        cfg.run.command.clone(),
        cfg.run.dir.clone(),
        cfg.run.log.clone(),
    )
    .silent(cfg.run.silent);

    match cfg.active_gyre() {
        Some(gyre) => gyre
            .files
            .iter()
            .map(|file| {
                let ctx = GyreContext {
                    enabled: true,
                    target_file: file.clone(),
                    data_format: gyre.data_format,
                    namelist: gyre.namelist.clone(),
                    completion_log: gyre.completion_log.clone(),
                };
                base.clone().with_gyre(ctx)
            })
            .collect(),
        None => vec![base],
    }
}

fn report(request: &RunRequest, verdict: &Verdict) {
    match verdict {
        Verdict::Success => debug!(cmd = %request.command, "run succeeded"),
        Verdict::Failed(reason) => warn!(
            cmd = %request.command,
            log = ?request.resolved_log_path(),
            %reason,
            "run failed"
        ),
    }
}

/// Simple dry-run output: print the resolved run plan.
fn print_dry_run(cfg: &ConfigFile) {
    println!("mesarun dry-run");
    println!("  dir = {}", cfg.run.dir.display());
    println!("  command = {}", cfg.run.command);
    println!("  log = {}", cfg.run.log.display());
    println!("  silent = {}", cfg.run.silent);
    println!("  jobs = {}", cfg.batch.jobs);

    if let Some(gyre) = cfg.active_gyre() {
        println!();
        println!("gyre:");
        println!("  namelist = {}", gyre.namelist.display());
        println!("  data_format = {:?}", gyre.data_format);
        println!("  completion_log = {}", gyre.completion_log.display());
        println!("  files ({}):", gyre.files.len());
        for file in &gyre.files {
            println!("    - {file}");
        }
    }

    debug!("dry-run complete (no execution)");
}
