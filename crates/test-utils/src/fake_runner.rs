use std::sync::{Arc, Mutex};
use std::time::Duration;

use mesarun::exec::{RunBackend, RunFuture, RunRequest};
use mesarun::types::{RunMode, Verdict};

/// A fake backend that:
/// - records every request it is given (command, mode, GYRE target)
/// - tracks how many runs were in flight at once
/// - answers with `Verdict::Success` unless the label is in `failing`.
#[derive(Debug, Default)]
pub struct FakeRunner {
    pub seen: Arc<Mutex<Vec<(String, RunMode)>>>,
    pub failing: Vec<String>,
    pub delay: Duration,
    in_flight: Mutex<usize>,
    pub max_in_flight: Arc<Mutex<usize>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, label: &str) -> Self {
        self.failing.push(label.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn label(request: &RunRequest) -> String {
        request
            .gyre
            .as_ref()
            .map(|g| g.target_file.clone())
            .unwrap_or_else(|| request.command.to_string())
    }
}

impl RunBackend for FakeRunner {
    fn run<'a>(&'a self, request: &'a RunRequest) -> RunFuture<'a> {
        Box::pin(async move {
            let label = Self::label(request);
            self.seen.lock().unwrap().push((label.clone(), request.mode));

            {
                let mut n = self.in_flight.lock().unwrap();
                *n += 1;
                let mut max = self.max_in_flight.lock().unwrap();
                *max = (*max).max(*n);
            }

            tokio::time::sleep(self.delay).await;

            *self.in_flight.lock().unwrap() -= 1;

            if self.failing.contains(&label) {
                Ok(Verdict::Failed(mesarun::types::FailureReason::Exit {
                    code: 1,
                    stderr_tail: format!("{label} failed"),
                }))
            } else {
                Ok(Verdict::Success)
            }
        })
    }
}
