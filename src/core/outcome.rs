//! Typed run outcomes
//!
//! Operations report success or categorized failure as a value; deciding
//! whether a failure terminates the host process is the caller's business
//! (the CLI maps outcomes to exit codes, a watch session keeps going).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// How a compile invocation treats a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Abort the remaining batch on the first failure
    FailFast,
    /// Report the failure, skip the file, keep going
    Resilient,
}

/// How a validate invocation treats a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintMode {
    /// Violations make the outcome fatal (CI-style one-shot checks)
    Strict,
    /// Violations are reported but the session survives (watch mode)
    Lenient,
}

/// Category of a recorded failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Transform,
    PostProcess,
    Io,
    Lint,
    Docs,
}

/// A single recorded failure
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub kind: FailureKind,

    /// Source file the failure is attributed to, when there is one
    pub source: Option<PathBuf>,

    /// Whatever the underlying tool or stage reported
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, source: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            source,
            message: message.into(),
        }
    }
}

/// Outcome of one operation invocation
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub run_id: Uuid,

    /// Operation name (compile, clean, validate, docs)
    pub operation: &'static str,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Files processed (compiled, deleted, linted, documented)
    pub files: usize,

    pub failures: Vec<Failure>,
}

impl RunOutcome {
    /// Start tracking an invocation
    pub fn begin(operation: &'static str) -> RunTracker {
        RunTracker {
            run_id: Uuid::new_v4(),
            operation,
            started_at: Utc::now(),
            files: 0,
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Exit status for callers that chose to make this outcome fatal
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Accumulates counts and failures while an operation runs
#[derive(Debug)]
pub struct RunTracker {
    pub run_id: Uuid,
    operation: &'static str,
    started_at: DateTime<Utc>,
    files: usize,
    failures: Vec<Failure>,
}

impl RunTracker {
    pub fn file_done(&mut self) {
        self.files += 1;
    }

    pub fn files_done(&mut self, count: usize) {
        self.files += count;
    }

    pub fn record(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn finish(self) -> RunOutcome {
        RunOutcome {
            run_id: self.run_id,
            operation: self.operation,
            started_at: self.started_at,
            finished_at: Utc::now(),
            files: self.files,
            failures: self.failures,
        }
    }
}
