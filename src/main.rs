use clap::Parser;
use std::process::ExitCode;
use update_repos::cli::Cli;
use update_repos::config::{self, Config};
use update_repos::git::GitCli;
use update_repos::output::{self, LogCallbacks};
use update_repos::workspace;

fn main() -> anyhow::Result<ExitCode> {
    config::init_logging();
    let cli = Cli::parse();

    log::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_dir:% = cli.base_dir.display();
        "Starting repository updater"
    );

    let config = Config::from_cli(&cli).inspect_err(|e| {
        log::error!(error:% = e; "Update process failed");
    })?;
    output::print_working_dir(config.base_dir());

    let summary = workspace::update_workspace(&GitCli, &config, &LogCallbacks::default())
        .inspect_err(|e| {
            log::error!(error:% = e; "Update process failed");
        })?;
    output::print_summary(&summary);

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        log::error!("Update process failed: some repositories failed to update");
        Ok(ExitCode::FAILURE)
    }
}
