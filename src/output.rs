//! Progress callbacks, colored output, and summary formatting.
//!
//! Structured log records go to stderr through the `log` facade; the
//! human-oriented summary printed here goes to stdout.

use crate::repo::{RepositoryOutcome, UpdateCallbacks, UpdateResult, UpdateStep};
use crate::workspace::RunSummary;
use colored::Colorize;
use std::path::Path;
use std::time::Duration;

/// No-op callbacks for when progress tracking is not needed.
/// This is the null object pattern for UpdateCallbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCallbacks;

impl UpdateCallbacks for NoOpCallbacks {
    fn on_step(&self, _step: &UpdateStep) {}
    fn on_complete(&self, _result: &UpdateResult) {}
}

/// Reports each step at debug level, tagged with the repository name.
#[derive(Debug, Default)]
pub struct LogCallbacks {
    current: std::cell::RefCell<String>,
}

impl UpdateCallbacks for LogCallbacks {
    fn on_update_start(&self, repo_name: &str) {
        *self.current.borrow_mut() = repo_name.to_string();
    }

    fn on_step(&self, step: &UpdateStep) {
        log::debug!(name:% = self.current.borrow(), step:% = step; "{}...", step);
    }

    fn on_complete(&self, result: &UpdateResult) {
        let elapsed = format_duration(result.duration);
        log::debug!(name:% = result.name(), elapsed:% = elapsed; "finished");
    }
}

pub fn print_working_dir(path: &Path) {
    println!(
        "{} {}",
        "Working in:".cyan(),
        path.display().to_string().white().bold()
    )
}

pub fn print_summary(summary: &RunSummary) {
    print_section("Summary");

    if summary.processed == 0 {
        println!("{}", "No directories found".yellow().bold());
    }

    let mut succeeded = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();
    for result in &summary.results {
        match &result.outcome {
            RepositoryOutcome::Succeeded(_) => succeeded.push(result),
            RepositoryOutcome::Skipped(_) => skipped.push(result),
            RepositoryOutcome::Failed(_) => failed.push(result),
        }
    }

    print_successes(&succeeded);
    print_skipped(&skipped);
    print_failures(&failed);
    print_left_stashes(&succeeded);

    println!(
        "{}: {} processed, {} updated, {} not updated in {}",
        "Total".white().bold(),
        summary.processed,
        summary.successful.to_string().green(),
        summary.failed().to_string().red(),
        format_duration(summary.duration)
    );
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f32())
}

fn print_section(title: &str) {
    let line = "=".repeat(50).cyan().dimmed();
    let padding = (50 - title.len()) / 2;
    let centered = format!("{:>width$}", title, width = padding + title.len());
    println!("\n{}\n{}\n{}\n", line, centered.cyan().bold(), line);
}

fn print_successes(successes: &[&UpdateResult]) {
    if successes.is_empty() {
        return;
    }
    println!(
        "{}",
        format!("Succeeded ({}):", successes.len()).green().bold()
    );

    for result in successes {
        if let RepositoryOutcome::Succeeded(success) = &result.outcome {
            let stash_msg = if success.stashed {
                " (changes stashed)".yellow()
            } else {
                "".normal()
            };
            println!(
                "  {} {} {}{} in {}",
                "OK".green().bold(),
                result.name().white(),
                success.branch.cyan(),
                stash_msg,
                format_duration(result.duration).dimmed(),
            );
        }
    }
    println!();
}

fn print_skipped(skipped: &[&UpdateResult]) {
    if skipped.is_empty() {
        return;
    }
    println!("{}", format!("Skipped ({}):", skipped.len()).yellow().bold());

    for result in skipped {
        if let RepositoryOutcome::Skipped(reason) = &result.outcome {
            println!(
                "  {} {} {}",
                "SKIP".yellow().bold(),
                result.name().white(),
                reason.to_string().dimmed(),
            );
        }
    }
    println!();
}

fn print_failures(failures: &[&UpdateResult]) {
    if failures.is_empty() {
        return;
    }

    println!("{}", format!("Failed ({}):", failures.len()).red().bold());

    for result in failures {
        if let RepositoryOutcome::Failed(failure) = &result.outcome {
            println!(
                "  {} {} {} in {}",
                "FAIL".red().bold(),
                result.name().white(),
                format!("{} ({})", failure.reason, failure.step).red(),
                format_duration(result.duration).dimmed(),
            );
        }
    }
    println!();
}

/// Stashes are never popped; point the user at every one we created.
fn print_left_stashes(successes: &[&UpdateResult]) {
    let stashed: Vec<String> = successes
        .iter()
        .filter(|r| matches!(&r.outcome, RepositoryOutcome::Succeeded(s) if s.stashed))
        .map(|r| r.name())
        .collect();
    if stashed.is_empty() {
        return;
    }

    println!(
        "{}",
        "Local changes were stashed and left in place (see `git stash list`):".yellow()
    );
    for name in stashed {
        println!("  {}", name);
    }
    println!();
}
