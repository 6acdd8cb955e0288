//! Repository detection, update logic, result types.

use crate::constants::{
    DEFAULT_REPO_NAME, GIT_DIR, PRIMARY_BRANCH_CANDIDATES, REMOTE, STASH_MESSAGE_PREFIX,
    STASH_TIMESTAMP_FORMAT,
};
use crate::context::UpdateContext;
use crate::error::AccessError;
use crate::git::VcsClient;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStep {
    Started,
    CheckingCommits,
    DetectingBranch,
    CheckingChanges,
    Stashing,
    Fetching,
    ResolvingPrimaryBranch,
    CheckingOut { branch: String },
    Pulling { branch: String },
    Completed,
}

impl UpdateStep {
    /// Reason recorded when this step fails.
    pub fn failure_reason(&self) -> String {
        match self {
            Self::CheckingChanges => "failed to check status".to_string(),
            Self::Stashing => "failed to stash changes".to_string(),
            Self::Fetching => "failed to fetch".to_string(),
            Self::ResolvingPrimaryBranch => "no main/master branch".to_string(),
            Self::CheckingOut { branch } => format!("failed to checkout {}", branch),
            Self::Pulling { .. } => "failed to pull".to_string(),
            other => format!("failed at {}", other),
        }
    }
}

impl fmt::Display for UpdateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("starting update"),
            Self::CheckingCommits => f.write_str("checking for commits"),
            Self::DetectingBranch => f.write_str("detecting current branch"),
            Self::CheckingChanges => f.write_str("checking for uncommitted changes"),
            Self::Stashing => f.write_str("stashing uncommitted changes"),
            Self::Fetching => write!(f, "fetching from {}", REMOTE),
            Self::ResolvingPrimaryBranch => f.write_str("resolving primary branch"),
            Self::CheckingOut { branch } => write!(f, "checking out {}", branch),
            Self::Pulling { branch } => write!(f, "pulling {} from {}", branch, REMOTE),
            Self::Completed => f.write_str("completed"),
        }
    }
}

/// Why a directory was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotARepository,
    NoCommits,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotARepository => f.write_str("not a git repository"),
            Self::NoCommits => f.write_str("has no commits"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSuccess {
    /// The primary branch that was checked out and pulled.
    pub branch: String,
    /// Branch checked out before the update; `None` for a detached HEAD.
    pub original_branch: Option<String>,
    /// Whether a stash was actually created. The stash is left in place.
    pub stashed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFailure {
    pub step: UpdateStep,
    pub reason: String,
    /// Underlying git error, when there is one.
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryOutcome {
    Skipped(SkipReason),
    Succeeded(UpdateSuccess),
    Failed(UpdateFailure),
}

impl RepositoryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

#[derive(Debug)]
pub struct UpdateResult {
    pub path: PathBuf,
    pub outcome: RepositoryOutcome,
    pub duration: Duration,
}

impl UpdateResult {
    pub fn name(&self) -> String {
        repo_name(&self.path)
    }
}

/// Progress notifications emitted while a repository is updated.
pub trait UpdateCallbacks {
    fn on_update_start(&self, _repo_name: &str) {}
    fn on_step(&self, step: &UpdateStep);
    fn on_complete(&self, result: &UpdateResult);
}

pub fn repo_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_REPO_NAME)
        .to_string()
}

/// Presence check only: a `.git` entry of any kind counts.
///
/// Only a missing entry disqualifies; an entry we cannot inspect still counts.
pub fn is_git_repo(path: &Path) -> bool {
    match std::fs::symlink_metadata(path.join(GIT_DIR)) {
        Ok(_) => true,
        Err(e) => e.kind() != std::io::ErrorKind::NotFound,
    }
}

/// Lists the immediate children of `base` that are directories, sorted by name.
///
/// Entry types come from the listing itself, so symlinks are not followed.
pub fn list_directories(base: &Path) -> Result<Vec<PathBuf>, AccessError> {
    let read_err = |source| AccessError::ReadDir {
        path: base.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(base).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_type().map_err(read_err)?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

pub fn stash_message(now: DateTime<Local>) -> String {
    format!("{STASH_MESSAGE_PREFIX} {}", now.format(STASH_TIMESTAMP_FORMAT))
}

/// Short-circuit out of the update sequence.
enum Halt {
    Skip(SkipReason),
    Fail(UpdateFailure),
}

fn at_step<T>(step: UpdateStep, result: anyhow::Result<T>) -> Result<T, Halt> {
    result.map_err(|e| {
        Halt::Fail(UpdateFailure {
            reason: step.failure_reason(),
            detail: Some(format!("{:#}", e)),
            step,
        })
    })
}

/// Brings one directory up to date with `origin`.
///
/// Failures stay local to this repository: they are logged, appended to the
/// context's failure list and returned as the outcome.
pub fn update<V, C>(vcs: &V, ctx: &mut UpdateContext, path: &Path, callbacks: &C) -> UpdateResult
where
    V: VcsClient + ?Sized,
    C: UpdateCallbacks + ?Sized,
{
    let start = Instant::now();
    let name = repo_name(path);
    callbacks.on_update_start(&name);
    log::info!(name:% = name; "Processing repository");

    let outcome = match do_update(vcs, path, &name, callbacks) {
        Ok(success) => {
            log::info!(name:% = name, branch:% = success.branch; "Successfully updated repository");
            RepositoryOutcome::Succeeded(success)
        }
        Err(Halt::Skip(reason)) => {
            log::info!(name:% = name; "SKIP: {}", reason);
            RepositoryOutcome::Skipped(reason)
        }
        Err(Halt::Fail(failure)) => {
            let detail = failure.detail.as_deref().unwrap_or("-");
            log::error!(
                name:% = name,
                step:% = failure.step,
                error:% = detail;
                "Repository update failed: {}", failure.reason
            );
            ctx.record_failure(&name, &failure.reason);
            RepositoryOutcome::Failed(failure)
        }
    };

    let result = UpdateResult {
        path: path.to_path_buf(),
        outcome,
        duration: start.elapsed(),
    };
    callbacks.on_complete(&result);
    result
}

fn do_update<V, C>(
    vcs: &V,
    path: &Path,
    name: &str,
    callbacks: &C,
) -> Result<UpdateSuccess, Halt>
where
    V: VcsClient + ?Sized,
    C: UpdateCallbacks + ?Sized,
{
    callbacks.on_step(&UpdateStep::Started);
    if !is_git_repo(path) {
        return Err(Halt::Skip(SkipReason::NotARepository));
    }

    callbacks.on_step(&UpdateStep::CheckingCommits);
    if !vcs.resolves(path, "HEAD") {
        return Err(Halt::Skip(SkipReason::NoCommits));
    }

    callbacks.on_step(&UpdateStep::DetectingBranch);
    let original_branch = match vcs.current_branch(path) {
        Ok(branch) if !branch.is_empty() => Some(branch),
        _ => {
            log::warn!(name:% = name; "in detached HEAD state");
            None
        }
    };

    callbacks.on_step(&UpdateStep::CheckingChanges);
    let is_dirty = at_step(UpdateStep::CheckingChanges, vcs.has_uncommitted_changes(path))?;

    let mut stashed = false;
    if is_dirty {
        callbacks.on_step(&UpdateStep::Stashing);
        log::warn!(name:% = name; "has uncommitted changes - stashing");
        let message = stash_message(Local::now());
        stashed = at_step(UpdateStep::Stashing, vcs.stash_push(path, &message))?;
        if !stashed {
            log::info!(name:% = name; "no tracked changes to stash");
        }
    }

    callbacks.on_step(&UpdateStep::Fetching);
    at_step(UpdateStep::Fetching, vcs.fetch(path, REMOTE))?;

    callbacks.on_step(&UpdateStep::ResolvingPrimaryBranch);
    let branch = resolve_primary_branch(vcs, path).ok_or_else(|| {
        Halt::Fail(UpdateFailure {
            step: UpdateStep::ResolvingPrimaryBranch,
            reason: UpdateStep::ResolvingPrimaryBranch.failure_reason(),
            detail: None,
        })
    })?;

    let step = UpdateStep::CheckingOut {
        branch: branch.clone(),
    };
    callbacks.on_step(&step);
    at_step(step, vcs.checkout(path, &branch))?;

    let step = UpdateStep::Pulling {
        branch: branch.clone(),
    };
    callbacks.on_step(&step);
    at_step(step, vcs.pull(path, REMOTE, &branch))?;

    callbacks.on_step(&UpdateStep::Completed);

    Ok(UpdateSuccess {
        branch,
        original_branch,
        stashed,
    })
}

/// `main` wins over `master`; nothing else is considered.
fn resolve_primary_branch<V: VcsClient + ?Sized>(vcs: &V, path: &Path) -> Option<String> {
    PRIMARY_BRANCH_CANDIDATES
        .iter()
        .find(|branch| vcs.resolves(path, &format!("{}/{}", REMOTE, branch)))
        .map(|branch| branch.to_string())
}
