//! Batch driver: updates every directory under the base directory in turn.

use crate::config::Config;
use crate::context::{RepoFailure, UpdateContext};
use crate::error::{AccessError, Result};
use crate::git::VcsClient;
use crate::repo::{self, RepositoryOutcome, UpdateCallbacks, UpdateResult};
use std::path::Path;
use std::time::{Duration, Instant};

/// Totals and per-repository results of one run.
#[derive(Debug)]
pub struct RunSummary {
    /// Directories visited, whatever their outcome.
    pub processed: usize,
    pub successful: usize,
    pub results: Vec<UpdateResult>,
    /// Failures in processing order.
    pub failures: Vec<RepoFailure>,
    pub duration: Duration,
}

impl RunSummary {
    /// Everything that did not succeed, skips included.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.processed - self.successful
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, RepositoryOutcome::Skipped(_)))
            .count()
    }

    /// A run succeeds when no repository failed; skips do not count against it.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

fn enter(dir: &Path) -> Result<()> {
    std::env::set_current_dir(dir).map_err(|source| AccessError::BaseDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn restore(dir: &Path) -> Result<()> {
    std::env::set_current_dir(dir).map_err(|source| AccessError::RestoreDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Updates every immediate subdirectory of the configured base directory.
///
/// Repositories are processed one at a time in scan order. Per-repository
/// failures are collected and never stop the batch; only losing access to the
/// base directory does.
pub fn update_workspace<V, C>(vcs: &V, config: &Config, callbacks: &C) -> Result<RunSummary>
where
    V: VcsClient + ?Sized,
    C: UpdateCallbacks + ?Sized,
{
    let start = Instant::now();
    let base_dir = config.base_dir();
    log::info!(base_dir:% = base_dir.display(); "Starting repository update process");

    if let Err(err) = enter(base_dir) {
        log::error!(base_dir:% = base_dir.display(); "Cannot access base directory");
        return Err(err);
    }

    let dirs = repo::list_directories(base_dir).inspect_err(|_| {
        log::error!(base_dir:% = base_dir.display(); "Cannot read directory contents");
    })?;

    let mut ctx = UpdateContext::new(base_dir);
    let mut results = Vec::with_capacity(dirs.len());
    let mut successful = 0;

    for dir in &dirs {
        let result = repo::update(vcs, &mut ctx, dir, callbacks);
        if result.outcome.is_success() {
            successful += 1;
        }
        results.push(result);

        if let Err(err) = restore(ctx.base_dir()) {
            log::error!(base_dir:% = base_dir.display(); "Cannot return to base directory");
            return Err(err);
        }
    }

    let summary = RunSummary {
        processed: dirs.len(),
        successful,
        results,
        failures: ctx.into_failures(),
        duration: start.elapsed(),
    };
    log_summary(&summary);
    Ok(summary)
}

fn log_summary(summary: &RunSummary) {
    log::info!("=== SUMMARY ===");
    log::info!(
        processed = summary.processed,
        successful = summary.successful,
        failed = summary.failed(),
        skipped = summary.skipped();
        "Repository update summary"
    );

    if summary.is_success() {
        log::info!("All repositories updated successfully!");
    } else {
        let failures: Vec<String> = summary.failures.iter().map(ToString::to_string).collect();
        log::error!(failures:? = failures; "Failed repositories");
    }
}
