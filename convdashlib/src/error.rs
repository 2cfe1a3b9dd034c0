//! Error types for convdashlib

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while loading, querying or exporting booking data.
///
/// Pipeline stages past the record source never return these for data
/// problems: empty datasets, unmatched drill-downs and unreadable cell values
/// are expressed as sentinel values instead.
#[derive(Error, Debug)]
pub enum ConvdashError {
    /// Failed to read or decode a CSV record export
    #[error("failed to read records from '{path}': {source}")]
    CsvRead { path: PathBuf, source: csv::Error },

    /// Failed to serialize a table to CSV
    #[error("failed to write CSV: {0}")]
    Export(#[from] csv::Error),

    /// Unknown quick period name
    #[error("unknown period: {0}")]
    InvalidPeriod(String),

    /// Unknown facet name
    #[error("unknown facet: {0}")]
    InvalidFacet(String),

    /// Unknown row field name
    #[error("unknown field: {0}")]
    InvalidField(String),

    /// Unknown pivot view name
    #[error("unknown view: {0}")]
    InvalidView(String),

    /// Requested range reaches further back than the lookback window allows
    #[error("date range {start}..={end} starts before the earliest allowed date {earliest}")]
    RangeOutsideWindow {
        start: NaiveDate,
        end: NaiveDate,
        earliest: NaiveDate,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
