mod cli;
mod csv_io;
mod dedup;
mod error;
mod logging;
mod merge;
mod record;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    merge::run(args)?;
    Ok(())
}
