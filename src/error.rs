use std::io;

use thiserror::Error;

use crate::record::Input;

/// Errors raised while reading, merging, or writing credential exports.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("malformed row at {input} line {line}: expected at least 6 fields, found {found}")]
    MalformedRecord { input: Input, line: u64, found: usize },
    #[error("{input} has no header row")]
    MissingHeader { input: Input },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type MergeResult<T> = Result<T, MergeError>;
