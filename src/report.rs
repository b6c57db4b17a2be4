//! Operator-facing conflict diagnostics.

use std::path::Path;

use tracing::{info, warn};

use crate::dedup::Conflict;

const RULE: &str = "--------------------";

/// Render a conflict as report lines: the identity key, then one block per
/// differing diff-worthy field holding the incoming and existing values.
pub fn render(conflict: &Conflict) -> Vec<String> {
    let mut lines = vec![conflict.key().to_string()];
    for diff in conflict.diffs() {
        lines.push(diff.field.label().to_string());
        lines.push(RULE.to_string());
        lines.push(String::from_utf8_lossy(diff.incoming).into_owned());
        lines.push(String::from_utf8_lossy(diff.existing).into_owned());
        lines.push(RULE.to_string());
    }
    lines
}

pub fn log_conflict(conflict: &Conflict) {
    warn!(
        "conflict between {} and {}",
        conflict.incoming.origin(),
        conflict.existing.origin()
    );
    for line in render(conflict) {
        warn!("{}", line);
    }
}

/// Counts describing a finished merge.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Summary {
    pub retained: usize,
    pub discarded: usize,
    pub conflicts: usize,
}

pub fn log_summary(summary: &Summary, output: &Path) {
    info!(
        retained = summary.retained,
        duplicates = summary.discarded,
        conflicts = summary.conflicts,
        "merge complete"
    );
    if summary.conflicts > 0 {
        warn!(
            "CONFLICTS DETECTED. CHECK END OF OUTPUT FILE {} TO RESOLVE",
            output.display()
        );
    }
}
