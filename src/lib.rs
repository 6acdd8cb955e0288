//! Batch updater for a directory of git checkouts.
//!
//! For every immediate subdirectory of a base directory this crate:
//! - Skips directories that are not repositories or have no commits
//! - Stashes uncommitted changes (the stash is left in place)
//! - Fetches from `origin`
//! - Checks out `main`, falling back to `master`, and pulls it
//!
//! Per-repository failures are collected and reported; they never stop the batch.

pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod git;
pub mod output;
pub mod repo;
pub mod workspace;
