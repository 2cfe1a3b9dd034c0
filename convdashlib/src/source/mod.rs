//! Record sources: where booking data comes from.
//!
//! This module handles the first stage of the pipeline - fetching raw
//! records for a date range. It provides:
//!
//! - **Ranges**: Validated custom ranges and quick periods (`DateRange`, `Period`)
//! - **Sources**: The `RecordSource` trait and its CSV implementation
//! - **Datasets**: Loading with source exclusion and empty-data notices
//!
//! Sources are explicit values passed to [`load_dataset`]; nothing here
//! holds global connection state.

pub mod dataset;
pub mod file;
pub mod range;

pub use dataset::{load_dataset, Dataset, SourceOptions, DEFAULT_EXCLUDED_SOURCES};
pub use file::CsvSource;
pub use range::{DateRange, Period, DEFAULT_LOOKBACK_DAYS};

use crate::data::RawRecord;
use crate::Result;

/// Anything that can deliver raw records for a date range.
pub trait RecordSource {
    /// Records whose local booking date falls in `range`.
    fn fetch(&mut self, range: &DateRange) -> Result<Vec<RawRecord>>;
}
