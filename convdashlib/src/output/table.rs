//! Table-ready data structures for pivot and detail output.
//!
//! This module provides `Table`, a presentation-ready structure that the
//! CLI renders and the exporter serializes.
//!
//! The data flow is:
//! 1. Classified rows (filtered)
//! 2. PivotResult or DrilldownRows (counted or resolved)
//! 3. Table (formatted strings keyed by column id)
//!
//! Table is a pure presentation layer: it formats, it never filters or counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::Field;
use crate::query::{PivotResult, RowKey, GRAND_TOTAL, TOTAL_LEADS};

/// Header for the drill-down serial number column.
pub const SERIAL_COLUMN: &str = "S.No";

/// Formatted cells under column ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Column ids, e.g. `master_service`, `Grand Total`, `Goaxled`
    pub columns: Vec<String>,
    /// One entry per column, in column order
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            title: None,
            columns,
            rows: Vec::new(),
        }
    }

    /// Builder: set the title.
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Format a pivot: index columns, then Grand Total, then categories.
    ///
    /// The Grand Total row carries its label in the first index column and
    /// leaves the other index columns blank.
    pub fn from_pivot(pivot: &PivotResult) -> Self {
        let mut columns: Vec<String> = pivot.index.iter().map(|f| f.id().to_string()).collect();
        columns.push(GRAND_TOTAL.to_string());
        columns.extend(pivot.columns.iter().cloned());

        let mut table = Table::new(columns);
        for row in &pivot.rows {
            let mut values = match &row.key {
                RowKey::Group(values) => values.clone(),
                RowKey::GrandTotal => {
                    let mut values = vec![String::new(); pivot.index.len()];
                    if let Some(first) = values.first_mut() {
                        *first = GRAND_TOTAL.to_string();
                    }
                    values
                }
            };
            values.push(row.total.to_string());
            values.extend(row.cells.iter().map(|c| c.display()));
            table.push_row(values);
        }
        table
    }
}

/// Display names for column ids; unknown ids pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLabels {
    names: BTreeMap<String, String>,
}

impl ColumnLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: map a column id to a display name.
    pub fn with(mut self, id: &str, name: &str) -> Self {
        self.names.insert(id.to_string(), name.to_string());
        self
    }

    /// Labels used for pivot headers.
    pub fn pivot() -> Self {
        Field::ALL
            .into_iter()
            .fold(Self::new(), |labels, f| labels.with(f.id(), f.pivot_label()))
            .with(GRAND_TOTAL, TOTAL_LEADS)
    }

    /// Labels used for drill-down detail headers.
    pub fn details() -> Self {
        Field::ALL
            .into_iter()
            .fold(Self::new(), |labels, f| labels.with(f.id(), f.detail_label()))
    }

    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.names.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Display names for a table's columns.
    pub fn headers(&self, table: &Table) -> Vec<String> {
        table
            .columns
            .iter()
            .map(|c| self.label(c).to_string())
            .collect()
    }
}
