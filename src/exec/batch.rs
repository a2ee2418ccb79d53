// src/exec/batch.rs

//! Running several simulator invocations side by side.
//!
//! Every request is switched to [`RunMode::ParallelBatch`]: GYRE runs get a
//! private namelist copy and nobody touches the live status display. At most
//! `jobs` runs are in flight at once.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::errors::{MesarunError, Result};
use crate::types::{RunMode, Verdict};

use super::backend::RunBackend;
use super::runner::RunRequest;

/// Outcome of one request in a batch.
#[derive(Debug)]
pub struct BatchResult {
    /// Position of the request in the input.
    pub index: usize,
    /// GYRE target file, or the command line for plain runs.
    pub label: String,
    pub outcome: Result<Verdict>,
}

impl BatchResult {
    pub fn succeeded(&self) -> bool {
        matches!(&self.outcome, Ok(v) if v.is_success())
    }
}

/// Run all `requests` with at most `jobs` concurrent children.
///
/// Results come back in input order. A request that fails to launch does not
/// stop the others.
pub async fn run_batch(
    backend: Arc<dyn RunBackend>,
    requests: Vec<RunRequest>,
    jobs: usize,
) -> Vec<BatchResult> {
    let jobs = jobs.max(1);
    let permits = Arc::new(Semaphore::new(jobs));
    info!(runs = requests.len(), jobs, "starting parallel batch");

    let mut handles = Vec::with_capacity(requests.len());
    for (index, request) in requests.into_iter().enumerate() {
        let request = request.with_mode(RunMode::ParallelBatch);
        let label = label_for(&request);
        let backend = Arc::clone(&backend);
        let permits = Arc::clone(&permits);

        let handle = tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| MesarunError::Other(e.into()))?;
            debug!(index, "batch run acquired a slot");
            backend.run(&request).await
        });
        handles.push((index, label, handle));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (index, label, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(MesarunError::Other(e.into())),
        };
        match &outcome {
            Ok(verdict) => info!(%label, success = verdict.is_success(), "batch run finished"),
            Err(e) => error!(%label, error = %e, "batch run could not complete"),
        }
        results.push(BatchResult {
            index,
            label,
            outcome,
        });
    }

    results
}

fn label_for(request: &RunRequest) -> String {
    match &request.gyre {
        Some(ctx) if ctx.enabled => ctx.target_file.clone(),
        _ => request.command.to_string(),
    }
}
