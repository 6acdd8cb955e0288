//! Fatal error types.
//!
//! Anything in here aborts the whole run. Per-repository problems never end up
//! here; they become [`crate::repo::RepositoryOutcome::Failed`] instead.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AccessError>;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("cannot access base directory {}: {source}", .path.display())]
    BaseDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read directory contents of {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot return to base directory {}: {source}", .path.display())]
    RestoreDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AccessError {
    /// The directory the failed operation was aimed at.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::BaseDir { path, .. }
            | Self::ReadDir { path, .. }
            | Self::RestoreDir { path, .. } => path,
        }
    }
}
