use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "update-repos",
    about = "Stash, fetch and pull every git checkout directly under a directory",
    version
)]
pub struct Cli {
    /// Directory whose immediate subdirectories are updated (defaults to current directory)
    #[arg(value_name = "BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,
}
