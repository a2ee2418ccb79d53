// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] turns a configured command into a `tokio::process::Command`.
//! - [`monitor`] scans simulator stdout for progress and early termination.
//! - [`runner`] runs one request end to end and produces a `Verdict`.
//! - [`backend`] is the `RunBackend` seam used by the batch executor.
//! - [`batch`] runs many requests concurrently.

pub mod backend;
pub mod batch;
pub mod command;
pub mod monitor;
pub mod runner;

pub use backend::{RunBackend, RunFuture};
pub use batch::{BatchResult, run_batch};
pub use command::{CommandSpec, split_command_line};
pub use monitor::OutputMonitor;
pub use runner::{ProcessRunner, RunRequest};
