//! Record source backed by a CSV export of the bookings table.

use std::path::{Path, PathBuf};

use crate::data::RawRecord;
use crate::error::ConvdashError;
use crate::Result;

use super::range::DateRange;
use super::RecordSource;

/// Reads booking records from a CSV file with a header row.
///
/// The file is opened on every fetch and closed when the fetch returns.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvSource {
    fn fetch(&mut self, range: &DateRange) -> Result<Vec<RawRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| ConvdashError::CsvRead {
                path: self.path.clone(),
                source: e,
            })?;

        let mut records = Vec::new();
        let mut undated = 0usize;
        let mut malformed = 0usize;
        for result in reader.deserialize::<RawRecord>() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    malformed += 1;
                    tracing::debug!(path = %self.path.display(), error = %e, "unreadable record");
                    continue;
                }
            };
            match record.booking_date() {
                Some(date) if range.contains(date) => records.push(record),
                Some(_) => {}
                None => undated += 1,
            }
        }

        if malformed > 0 {
            tracing::warn!(path = %self.path.display(), malformed, "skipped unreadable records");
        }
        if undated > 0 {
            tracing::debug!(path = %self.path.display(), undated, "skipped records without a timestamp");
        }
        tracing::debug!(
            path = %self.path.display(),
            range = %range,
            records = records.len(),
            "fetched records"
        );
        Ok(records)
    }
}
