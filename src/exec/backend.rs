// src/exec/backend.rs

//! Pluggable run backend.
//!
//! The batch executor talks to a `RunBackend` instead of a concrete
//! [`ProcessRunner`], so tests can swap in a fake that records requests and
//! returns canned verdicts without spawning anything.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::types::Verdict;

use super::runner::{ProcessRunner, RunRequest};

pub type RunFuture<'a> = Pin<Box<dyn Future<Output = Result<Verdict>> + Send + 'a>>;

/// Something that can carry out a [`RunRequest`].
pub trait RunBackend: Send + Sync {
    fn run<'a>(&'a self, request: &'a RunRequest) -> RunFuture<'a>;
}

impl RunBackend for ProcessRunner {
    fn run<'a>(&'a self, request: &'a RunRequest) -> RunFuture<'a> {
        Box::pin(ProcessRunner::run(self, request))
    }
}
