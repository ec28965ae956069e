//! The [`TwoBitError`] `enum` definition and error messages.
//!
use crate::Position;
use std::num::ParseIntError;
use std::string::FromUtf8Error;
use thiserror::Error;

/// The [`TwoBitError`] defines the standard set of errors that should
/// be passed to the user.
#[derive(Debug, Error)]
pub enum TwoBitError {
    // IO related errors
    #[error("File reading error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("HTTP request for '{url}' failed with status {status}")]
    Http { status: u16, url: String },
    #[error("Network error: {0}")]
    Network(String),

    // 2bit format errors
    #[error("Invalid 2bit signature: 0x{0:08X}")]
    InvalidSignature(u32),
    #[error("Unsupported 2bit version: {0}")]
    UnsupportedVersion(u32),
    #[error("2bit file is truncated: {needed} bytes required at offset {offset}")]
    TruncatedFile { offset: u64, needed: usize },
    #[error("Parse buffer ended early: {0} bytes required")]
    Incomplete(usize),
    #[error("Invalid UTF-8 data: {0}")]
    Utf8Error(#[from] FromUtf8Error),

    // Input parsing errors
    #[error("Integer parsing error: {0}")]
    ParseIntError(#[from] ParseIntError),
    #[error("Invalid region '{0}': expected 'contig:start-stop'")]
    InvalidRegion(String),
    #[error("Contig file is invalid: {0}")]
    InvalidGenomeFile(String),
    #[error("TSV error: {0}")]
    CsvError(#[from] csv::Error),

    // Range errors
    #[error("Requested a range with start > stop ({0}, {1})")]
    InvalidRange(Position, Position),
    #[error("Contig '{0}' is not in the 2bit index")]
    MissingContig(String),
}
