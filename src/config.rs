//! Runtime configuration derived from CLI arguments and the environment.

use crate::cli::Cli;
use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};
use crate::error::{AccessError, Result};
use std::path::{Path, PathBuf};

/// Runtime configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute base directory, resolved once at startup.
    base_dir: PathBuf,
}

impl Config {
    /// Resolves `base_dir` to an absolute path.
    ///
    /// Every later return to the base directory goes through this path, so a
    /// relative argument cannot drift if the process cwd changes mid-run.
    pub fn new(base_dir: &Path) -> Result<Self> {
        let base_dir = std::fs::canonicalize(base_dir).map_err(|source| AccessError::BaseDir {
            path: base_dir.to_path_buf(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::new(&cli.base_dir)
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Installs the global logger.
///
/// Log records go to stderr; the filter comes from `UPDATE_REPOS_LOG` and
/// defaults to `info`.
pub fn init_logging() {
    let env = env_logger::Env::default().filter_or(LOG_ENV_VAR, DEFAULT_LOG_FILTER);
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .init();
}
