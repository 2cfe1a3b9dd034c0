//! Reporting date ranges and quick period presets.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ConvdashError;
use crate::Result;

/// How far back a range may reach, in days.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 180;

/// Inclusive range of booking dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Validate a user-chosen range against the lookback window.
    ///
    /// Either bound before `today - lookback_days` is rejected. An `end`
    /// earlier than `start` is moved up to `start`.
    pub fn custom(
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
        lookback_days: i64,
    ) -> Result<Self> {
        let earliest = earliest_allowed(today, lookback_days);
        if start < earliest || end < earliest {
            return Err(ConvdashError::RangeOutsideWindow {
                start,
                end,
                earliest,
            });
        }
        Ok(Self {
            start,
            end: end.max(start),
        })
    }

    /// The full lookback window ending today.
    pub fn lookback(today: NaiveDate, lookback_days: i64) -> Self {
        Self {
            start: earliest_allowed(today, lookback_days),
            end: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

fn earliest_allowed(today: NaiveDate, lookback_days: i64) -> NaiveDate {
    today - Duration::days(lookback_days)
}

/// Quick period presets, relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisQuarter,
    ThisYear,
}

impl Period {
    pub const ALL: [Period; 8] = [
        Period::Today,
        Period::Yesterday,
        Period::ThisWeek,
        Period::LastWeek,
        Period::ThisMonth,
        Period::LastMonth,
        Period::ThisQuarter,
        Period::ThisYear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Yesterday => "yesterday",
            Period::ThisWeek => "this-week",
            Period::LastWeek => "last-week",
            Period::ThisMonth => "this-month",
            Period::LastMonth => "last-month",
            Period::ThisQuarter => "this-quarter",
            Period::ThisYear => "this-year",
        }
    }

    /// Calendar range of the period, with the start clamped to the lookback window.
    ///
    /// Weeks start on Monday. Ends may lie after `today` (this week, month,
    /// quarter and year run to their last day).
    pub fn range(self, today: NaiveDate, lookback_days: i64) -> DateRange {
        let (start, end) = match self {
            Period::Today => (today, today),
            Period::Yesterday => {
                let yesterday = today - Duration::days(1);
                (yesterday, yesterday)
            }
            Period::ThisWeek => {
                let start = week_start(today);
                (start, start + Duration::days(6))
            }
            Period::LastWeek => {
                let start = week_start(today) - Duration::days(7);
                (start, start + Duration::days(6))
            }
            Period::ThisMonth => (month_start(today), month_end(today)),
            Period::LastMonth => {
                let end = month_start(today) - Duration::days(1);
                (month_start(end), end)
            }
            Period::ThisQuarter => {
                let start = quarter_start(today);
                let last_month = next_month_start(next_month_start(start));
                (start, month_end(last_month))
            }
            Period::ThisYear => {
                let start = today - Duration::days(i64::from(today.ordinal0()));
                let next_year = start + Duration::days(366);
                let end = next_year - Duration::days(i64::from(next_year.ordinal0())) - Duration::days(1);
                (start, end)
            }
        };
        DateRange {
            start: start.max(earliest_allowed(today, lookback_days)),
            end,
        }
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn next_month_start(date: NaiveDate) -> NaiveDate {
    month_start(month_start(date) + Duration::days(31))
}

fn month_end(date: NaiveDate) -> NaiveDate {
    next_month_start(date) - Duration::days(1)
}

fn quarter_start(date: NaiveDate) -> NaiveDate {
    let mut start = month_start(date);
    for _ in 0..(date.month0() % 3) {
        start = month_start(start - Duration::days(1));
    }
    start
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = ConvdashError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        Period::ALL
            .into_iter()
            .find(|p| p.name() == needle)
            .ok_or_else(|| ConvdashError::InvalidPeriod(s.to_string()))
    }
}
