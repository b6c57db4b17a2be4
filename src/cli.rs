use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Merge two password-manager CSV exports, flagging conflicting entries."
)]
pub struct Args {
    /// First input export; its header row is written to the output
    #[arg(short = 'i', long = "input1")]
    pub input1: PathBuf,

    /// Second input export
    #[arg(short = 'j', long = "input2")]
    pub input2: PathBuf,

    /// Output file for the merged export
    #[arg(short, long)]
    pub output: PathBuf,

    /// Dry-run mode (no files written)
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Verbose logging
    #[arg(long = "verbose")]
    pub verbose: bool,
}
