//! Test infrastructure for update-repos integration tests.
#![allow(dead_code)]

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;
use update_repos::git::run_git;

static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that change or inspect the process working directory.
pub fn cwd_lock() -> MutexGuard<'static, ()> {
    CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn configure_identity(path: &Path) -> Result<()> {
    run_git(path, &["config", "user.email", "test@example.com"])?;
    run_git(path, &["config", "user.name", "Test User"])?;
    run_git(path, &["config", "commit.gpgsign", "false"])?;
    run_git(path, &["config", "pull.rebase", "false"])?;
    Ok(())
}

/// Initializes a repository on `branch` at `path` with one commit.
pub fn init_repo(path: &Path, branch: &str) -> Result<()> {
    std::fs::create_dir_all(path)?;
    run_git(path, &["init", "-b", branch])?;
    configure_identity(path)?;
    std::fs::write(path.join("README.md"), "# Test Repo\n")?;
    run_git(path, &["add", "README.md"])?;
    run_git(path, &["commit", "-m", "Initial commit"])?;
    Ok(())
}

/// Initializes a repository with no commits at all.
pub fn init_empty_repo(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    run_git(path, &["init", "-b", "master"])?;
    Ok(())
}

/// Creates a bare remote, registers it as `origin` of `repo` and pushes `branch`.
/// The returned TempDir owns the remote and must be kept alive.
pub fn add_remote(repo: &Path, branch: &str) -> Result<TempDir> {
    let remote_dir = TempDir::new()?;
    run_git(remote_dir.path(), &["init", "--bare"])?;
    let remote_path = remote_dir
        .path()
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("non UTF-8 temp path"))?;
    run_git(repo, &["remote", "add", "origin", remote_path])?;
    run_git(repo, &["push", "-u", "origin", branch])?;
    Ok(remote_dir)
}

/// Pushes a new commit to `branch` of `remote` from a throwaway clone.
/// Returns the new commit SHA.
pub fn push_upstream_commit(remote: &Path, branch: &str) -> Result<String> {
    let scratch = TempDir::new()?;
    let clone = scratch.path().join("clone");
    let remote_path = remote
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("non UTF-8 temp path"))?;
    let clone_path = clone
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("non UTF-8 temp path"))?;
    run_git(scratch.path(), &["clone", "-b", branch, remote_path, clone_path])?;
    configure_identity(&clone)?;
    std::fs::write(clone.join("UPSTREAM.md"), "upstream change\n")?;
    run_git(&clone, &["add", "UPSTREAM.md"])?;
    run_git(&clone, &["commit", "-m", "Upstream commit"])?;
    run_git(&clone, &["push", "origin", branch])?;
    run_git(&clone, &["rev-parse", "HEAD"])
}

/// A temporary git repository for testing.
/// Automatically cleaned up when dropped.
pub struct TestRepo {
    _temp_dir: TempDir,
    remote: Option<TempDir>,
    path: PathBuf,
}

impl TestRepo {
    /// Creates a new test repository with an initial commit on `branch`.
    pub fn new(branch: &str) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("repo");
        init_repo(&path, branch)?;

        Ok(Self {
            _temp_dir: temp_dir,
            remote: None,
            path,
        })
    }

    /// Creates a test repository whose `origin` holds `branch`.
    pub fn with_remote(branch: &str) -> Result<Self> {
        let mut repo = Self::new(branch)?;
        repo.remote = Some(add_remote(&repo.path, branch)?);
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remote_path(&self) -> Option<&Path> {
        self.remote.as_ref().map(TempDir::path)
    }

    /// Deletes the remote so any fetch fails.
    pub fn remove_remote(&mut self) {
        self.remote = None;
    }

    pub fn head(&self) -> Result<String> {
        run_git(&self.path, &["rev-parse", "HEAD"])
    }

    pub fn current_branch(&self) -> Result<String> {
        run_git(&self.path, &["branch", "--show-current"])
    }

    pub fn create_branch(&self, name: &str) -> Result<()> {
        run_git(&self.path, &["branch", name])?;
        Ok(())
    }

    /// Modifies a tracked file.
    pub fn make_dirty(&self) -> Result<()> {
        std::fs::write(self.path.join("README.md"), "# Modified\n")?;
        Ok(())
    }

    pub fn stash_list(&self) -> Result<String> {
        run_git(&self.path, &["stash", "list"])
    }

    pub fn has_stash(&self) -> Result<bool> {
        Ok(!self.stash_list()?.is_empty())
    }
}
