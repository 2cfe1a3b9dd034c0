//! Loading a reporting dataset from a record source.

use serde::{Deserialize, Serialize};

use crate::data::RawRecord;

use super::range::{DateRange, DEFAULT_LOOKBACK_DAYS};
use super::RecordSource;

/// Sources whose bookings never enter the dashboard.
pub const DEFAULT_EXCLUDED_SOURCES: &[&str] = &["Re-Engagement Bookings"];

/// Record loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOptions {
    /// How far back a date range may reach
    pub lookback_days: i64,
    /// `user_source` values dropped at load time
    pub excluded_sources: Vec<String>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            excluded_sources: DEFAULT_EXCLUDED_SOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the lookback window.
    pub fn lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    /// Builder: drop another source at load time.
    pub fn exclude_source(mut self, source: &str) -> Self {
        self.excluded_sources.push(source.to_string());
        self
    }

    /// Builder: keep every source.
    pub fn include_all_sources(mut self) -> Self {
        self.excluded_sources.clear();
        self
    }

    fn is_excluded(&self, record: &RawRecord) -> bool {
        let source = record.user_source.trim();
        self.excluded_sources.iter().any(|s| s == source)
    }
}

/// Records for one date range, with a notice when there is nothing to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub records: Vec<RawRecord>,
    pub range: DateRange,
    /// User-facing message set when the dataset is empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl Dataset {
    pub fn new(records: Vec<RawRecord>, range: DateRange) -> Self {
        let notice = records.is_empty().then(|| no_data_notice(&range));
        Self {
            records,
            range,
            notice,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn no_data_notice(range: &DateRange) -> String {
    format!("No data available from {} to {}.", range.start, range.end)
}

/// Fetch records for `range`, dropping excluded sources.
///
/// Fetch failures are logged and surface as an empty dataset with a notice.
pub fn load_dataset<S: RecordSource + ?Sized>(
    source: &mut S,
    range: DateRange,
    options: &SourceOptions,
) -> Dataset {
    let fetched = match source.fetch(&range) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(range = %range, error = %e, "record fetch failed");
            Vec::new()
        }
    };

    let total = fetched.len();
    let records: Vec<RawRecord> = fetched
        .into_iter()
        .filter(|r| !options.is_excluded(r))
        .collect();
    tracing::debug!(
        range = %range,
        fetched = total,
        excluded = total - records.len(),
        "loaded dataset"
    );

    Dataset::new(records, range)
}
