//! Clicked pivot cells.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::query::{ColumnKey, PivotResult, RowKey};

static LEADING_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)").expect("Invalid leading count regex"));

/// A pivot cell as the user sees it: row, column and displayed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: RowKey,
    pub column: ColumnKey,
    /// Display string, e.g. `"12 (40.0%)"` or `"37"`
    pub value: String,
}

impl CellRef {
    pub fn new(row: RowKey, column: ColumnKey, value: impl Into<String>) -> Self {
        Self {
            row,
            column,
            value: value.into(),
        }
    }

    /// Look up a cell in a built pivot. Rows absent from the pivot read as zero.
    pub fn from_pivot(pivot: &PivotResult, row: RowKey, column: ColumnKey) -> Self {
        let value = match pivot.find_row(&row) {
            Some(found) => pivot.display_value(found, &column),
            None => "0".to_string(),
        };
        Self { row, column, value }
    }

    /// Count encoded in the display value.
    pub fn count(&self) -> u64 {
        parse_cell_count(&self.value)
    }
}

/// Leading integer of a cell display string; anything unreadable is 0.
pub fn parse_cell_count(value: &str) -> u64 {
    LEADING_COUNT
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{classify, RawRecord};
    use crate::query::{aggregate, PivotView};

    #[test]
    fn test_parse_cell_count() {
        assert_eq!(parse_cell_count("12 (40.0%)"), 12);
        assert_eq!(parse_cell_count("37"), 37);
        assert_eq!(parse_cell_count("  5 (100.0%)"), 5);
        assert_eq!(parse_cell_count("0 (0%)"), 0);
    }

    #[test]
    fn test_parse_cell_count_malformed_is_zero() {
        assert_eq!(parse_cell_count(""), 0);
        assert_eq!(parse_cell_count("n/a"), 0);
        assert_eq!(parse_cell_count("(12%)"), 0);
        assert_eq!(parse_cell_count("99999999999999999999999"), 0);
    }

    #[test]
    fn test_from_pivot_reads_display_value() {
        let rows = classify(&[
            RawRecord::new(1)
                .with_master_service("Wash")
                .with_booking_status(1),
            RawRecord::new(2)
                .with_master_service("Wash")
                .with_booking_status(1),
        ]);
        let pivot = aggregate(&rows, &PivotView::Service.spec());

        let cell = CellRef::from_pivot(
            &pivot,
            RowKey::from_values(["Wash"]),
            ColumnKey::parse("Idle"),
        );
        assert_eq!(cell.value, "2 (100.0%)");
        assert_eq!(cell.count(), 2);

        let cell = CellRef::from_pivot(&pivot, RowKey::GrandTotal, ColumnKey::GrandTotal);
        assert_eq!(cell.value, "2");

        let cell = CellRef::from_pivot(
            &pivot,
            RowKey::from_values(["Repair"]),
            ColumnKey::parse("Idle"),
        );
        assert_eq!(cell.count(), 0);
    }
}
