//! Run-scoped state shared by the updater and the batch driver.

use std::fmt;
use std::path::{Path, PathBuf};

/// One failed repository, as recorded for the end-of-run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFailure {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for RepoFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// State for a single run over one base directory.
///
/// The updater appends to `failures`; the batch driver reads them once the
/// scan is done. Nothing here is shared between threads.
#[derive(Debug)]
pub struct UpdateContext {
    base_dir: PathBuf,
    failures: Vec<RepoFailure>,
}

impl UpdateContext {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            failures: Vec::new(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn record_failure(&mut self, name: &str, reason: &str) {
        self.failures.push(RepoFailure {
            name: name.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Failures in processing order.
    pub fn failures(&self) -> &[RepoFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<RepoFailure> {
        self.failures
    }
}
