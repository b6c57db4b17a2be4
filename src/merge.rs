use crate::cli::Args;
use crate::csv_io::{self, ExportReader};
use crate::dedup::{self, Store};
use crate::record::Input;
use crate::report::{self, Summary};
use anyhow::{Context, Result};
use std::fs::File;
use tracing::info;

pub fn run(args: Args) -> Result<Summary> {
    let first = ExportReader::open(&args.input1, Input::First).with_context(|| {
        format!("cannot open input file 1: {}", args.input1.display())
    })?;
    let second = ExportReader::open(&args.input2, Input::Second).with_context(|| {
        format!("cannot open input file 2: {}", args.input2.display())
    })?;

    // Input 2's header is read and dropped.
    let header = first.header().clone();

    let mut store = Store::new();
    let mut conflicts = dedup::merge(&mut store, first.into_records())
        .with_context(|| format!("cannot read {}", args.input1.display()))?;
    conflicts.extend(
        dedup::merge(&mut store, second.into_records())
            .with_context(|| format!("cannot read {}", args.input2.display()))?,
    );

    let summary = Summary {
        retained: store.len(),
        discarded: store.discarded(),
        conflicts: conflicts.len(),
    };

    if args.dry_run {
        println!(
            "Dry-run. Would write {} entries and {} conflicts to {}",
            summary.retained,
            summary.conflicts,
            args.output.display()
        );
        return Ok(summary);
    }

    let out = File::create(&args.output)
        .with_context(|| format!("cannot create output file {}", args.output.display()))?;
    csv_io::write_merged(out, &header, &store, &conflicts)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    info!("wrote {}", args.output.display());

    report::log_summary(&summary, &args.output);
    Ok(summary)
}
