//! Git command wrappers.
//!
//! This module provides a thin wrapper around git CLI commands,
//! handling command execution and error formatting. The updater only talks to
//! git through the [`VcsClient`] trait so it can be driven by a fake in tests.

use anyhow::Context;
use std::path::Path;

/// The version-control operations the updater needs, one method per command.
///
/// Every method runs against the working copy at `repo` and blocks until the
/// underlying command exits.
pub trait VcsClient {
    /// Whether `rev` resolves to an object (`HEAD`, `origin/main`, ...).
    fn resolves(&self, repo: &Path, rev: &str) -> bool;

    /// Name of the checked-out branch; empty when HEAD is detached.
    fn current_branch(&self, repo: &Path) -> anyhow::Result<String>;

    fn has_uncommitted_changes(&self, repo: &Path) -> anyhow::Result<bool>;

    /// Stashes tracked changes; `false` when git found nothing to stash.
    fn stash_push(&self, repo: &Path, message: &str) -> anyhow::Result<bool>;

    fn fetch(&self, repo: &Path, remote: &str) -> anyhow::Result<()>;

    fn checkout(&self, repo: &Path, branch: &str) -> anyhow::Result<()>;

    fn pull(&self, repo: &Path, remote: &str, branch: &str) -> anyhow::Result<()>;
}

/// [`VcsClient`] backed by the `git` binary on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

/// Runs `git <args>` inside `repo` and returns trimmed stdout.
pub fn run_git(repo: &Path, args: &[&str]) -> anyhow::Result<String> {
    log::debug!(repo:% = repo.display(), args:% = args.join(" "); "running git");

    let output = std::process::Command::new("git")
        .current_dir(repo)
        .args(args)
        .output()
        .context("Failed to execute git command")?;

    if output.status.success() {
        let result = String::from_utf8_lossy(&output.stdout);
        Ok(result.as_ref().trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim())
    }
}

fn validate_ref_name(name: &str) -> anyhow::Result<()> {
    if name.is_empty() || name.starts_with('-') || name.contains(['\0', '\n']) {
        anyhow::bail!("Invalid ref name: {:?}", name);
    }
    Ok(())
}

impl VcsClient for GitCli {
    fn resolves(&self, repo: &Path, rev: &str) -> bool {
        validate_ref_name(rev).is_ok()
            && run_git(repo, &["rev-parse", "--verify", "--quiet", rev]).is_ok()
    }

    fn current_branch(&self, repo: &Path) -> anyhow::Result<String> {
        run_git(repo, &["branch", "--show-current"]).context("Failed to get current branch")
    }

    fn has_uncommitted_changes(&self, repo: &Path) -> anyhow::Result<bool> {
        run_git(repo, &["status", "--porcelain"])
            .map(|output| !output.is_empty())
            .context("Failed to check for uncommitted changes")
    }

    fn stash_push(&self, repo: &Path, message: &str) -> anyhow::Result<bool> {
        let output =
            run_git(repo, &["stash", "push", "-m", message]).context("Failed to stash changes")?;
        Ok(!output.contains("No local changes to save"))
    }

    fn fetch(&self, repo: &Path, remote: &str) -> anyhow::Result<()> {
        validate_ref_name(remote)?;
        run_git(repo, &["fetch", remote])
            .with_context(|| format!("Failed to fetch from remote '{}'", remote))?;
        Ok(())
    }

    fn checkout(&self, repo: &Path, branch: &str) -> anyhow::Result<()> {
        validate_ref_name(branch)?;
        run_git(repo, &["checkout", branch])
            .with_context(|| format!("Failed to checkout branch '{}'", branch))?;
        Ok(())
    }

    fn pull(&self, repo: &Path, remote: &str, branch: &str) -> anyhow::Result<()> {
        validate_ref_name(remote)?;
        validate_ref_name(branch)?;
        run_git(repo, &["pull", remote, branch])
            .with_context(|| format!("Failed to pull '{}' from '{}'", branch, remote))?;
        Ok(())
    }
}
