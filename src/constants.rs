//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic strings throughout the codebase.

/// Git directory name used to detect repositories.
pub const GIT_DIR: &str = ".git";

/// The only remote this tool fetches from and pulls from.
pub const REMOTE: &str = "origin";

/// Primary branch candidates, in order of preference.
pub const MAIN_BRANCH: &str = "main";
pub const MASTER_BRANCH: &str = "master";
pub const PRIMARY_BRANCH_CANDIDATES: [&str; 2] = [MAIN_BRANCH, MASTER_BRANCH];

/// Prefix of the message attached to auto-created stashes.
pub const STASH_MESSAGE_PREFIX: &str = "Auto-stash before update";

/// Local-time format embedded in stash messages.
pub const STASH_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default name used when a repository name cannot be determined from its path.
pub const DEFAULT_REPO_NAME: &str = "repository";

/// Environment variable holding the log filter (env_logger syntax).
///
/// Example: `UPDATE_REPOS_LOG=debug update-repos ~/src`
pub const LOG_ENV_VAR: &str = "UPDATE_REPOS_LOG";

/// Log filter used when `UPDATE_REPOS_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";
