//! Pivot aggregation: cross-tabulate classified rows.
//!
//! A [`PivotResult`] sits between the filtered row set and the final table
//! output. It represents rows that have been:
//! - Restricted by the pivot predicate
//! - Grouped by the composite index key
//! - Counted per column category, with row-wise percentages
//! - Given a Grand Total row and column
//!
//! The data pipeline is:
//! 1. Classified rows (after facet filtering)
//! 2. PivotResult (counts and percentages)
//! 3. Table (formatted strings for display and export)

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{ClassifiedRow, Field};

use super::options::{Aggregate, PivotSpec, GRAND_TOTAL, STATUS_COLUMN_ORDER, TOTAL_LEADS};

/// Identity of a pivot row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowKey {
    /// One value per index field, in index order
    Group(Vec<String>),
    /// The margin row spanning every group
    GrandTotal,
}

impl RowKey {
    pub fn is_grand_total(&self) -> bool {
        matches!(self, RowKey::GrandTotal)
    }

    /// Build a key from user-supplied values; a lone "Grand Total" is the margin row.
    /// Data values spelled that way are escaped during classification.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.len() == 1 && values[0].trim().eq_ignore_ascii_case(GRAND_TOTAL) {
            RowKey::GrandTotal
        } else {
            RowKey::Group(values)
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Group(values) => f.write_str(&values.join(" / ")),
            RowKey::GrandTotal => f.write_str(GRAND_TOTAL),
        }
    }
}

/// Identity of a pivot column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKey {
    GrandTotal,
    /// A value of the pivot's column field
    Category(String),
}

impl ColumnKey {
    /// Parse a column id as shown in a table header or typed by a user.
    pub fn parse(id: &str) -> Self {
        let id = id.trim();
        if id.eq_ignore_ascii_case(GRAND_TOTAL) || id.eq_ignore_ascii_case(TOTAL_LEADS) {
            ColumnKey::GrandTotal
        } else {
            ColumnKey::Category(id.to_string())
        }
    }

    pub fn is_grand_total(&self) -> bool {
        matches!(self, ColumnKey::GrandTotal)
    }

    /// Column id as used in table data.
    pub fn id(&self) -> &str {
        match self {
            ColumnKey::GrandTotal => GRAND_TOTAL,
            ColumnKey::Category(c) => c,
        }
    }
}

/// One count with its share of the row total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotCell {
    pub count: u64,
    /// Percentage of the row's Grand Total, rounded to 2 decimals
    pub percentage: f64,
}

impl PivotCell {
    fn new(count: u64, row_total: u64) -> Self {
        let percentage = if row_total == 0 {
            0.0
        } else {
            round2(count as f64 / row_total as f64 * 100.0)
        };
        Self { count, percentage }
    }

    /// Combined display form, e.g. `10 (100.0%)`.
    pub fn display(&self) -> String {
        format!("{} ({}%)", self.count, format_percentage(self.percentage))
    }
}

/// One row of a pivot: cells aligned with [`PivotResult::columns`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub key: RowKey,
    pub cells: Vec<PivotCell>,
    /// Grand Total column value
    pub total: u64,
}

/// Cross-tabulated counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotResult {
    /// Index fields, in key order
    pub index: Vec<Field>,
    /// Field the columns came from
    pub column_field: Field,
    /// Category columns in display order (Grand Total excluded)
    pub columns: Vec<String>,
    /// Group rows in key order, followed by the Grand Total row
    pub rows: Vec<PivotRow>,
}

impl PivotResult {
    /// The explicit empty result: no columns, no rows, no Grand Total.
    pub fn empty(spec: &PivotSpec) -> Self {
        Self {
            index: spec.index.clone(),
            column_field: spec.column,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows excluding the Grand Total row.
    pub fn data_rows(&self) -> &[PivotRow] {
        match self.rows.split_last() {
            Some((last, rest)) if last.key.is_grand_total() => rest,
            _ => &self.rows,
        }
    }

    pub fn grand_total(&self) -> Option<&PivotRow> {
        self.rows.last().filter(|r| r.key.is_grand_total())
    }

    /// All columns in display order: Grand Total first.
    pub fn column_keys(&self) -> Vec<ColumnKey> {
        std::iter::once(ColumnKey::GrandTotal)
            .chain(self.columns.iter().cloned().map(ColumnKey::Category))
            .collect()
    }

    pub fn find_row(&self, key: &RowKey) -> Option<&PivotRow> {
        self.rows.iter().find(|r| r.key == *key)
    }

    /// Count in one cell; missing categories read as zero.
    pub fn count(&self, row: &PivotRow, column: &ColumnKey) -> u64 {
        match column {
            ColumnKey::GrandTotal => row.total,
            ColumnKey::Category(c) => self
                .columns
                .iter()
                .position(|col| col == c)
                .map(|i| row.cells[i].count)
                .unwrap_or(0),
        }
    }

    /// Display string of one cell, the form a user sees and clicks.
    pub fn display_value(&self, row: &PivotRow, column: &ColumnKey) -> String {
        match column {
            ColumnKey::GrandTotal => row.total.to_string(),
            ColumnKey::Category(c) => match self.columns.iter().position(|col| col == c) {
                Some(i) => row.cells[i].display(),
                None => PivotCell::new(0, row.total).display(),
            },
        }
    }
}

/// Build a pivot from classified rows.
pub fn aggregate(rows: &[ClassifiedRow], spec: &PivotSpec) -> PivotResult {
    // group key -> column category -> counted values
    let mut groups: BTreeMap<Vec<String>, BTreeMap<String, Vec<String>>> = BTreeMap::new();
    let mut observed: BTreeSet<String> = BTreeSet::new();

    for row in rows.iter().filter(|r| spec.predicate.matches(r)) {
        let key: Vec<String> = spec.index.iter().map(|f| row.value(*f)).collect();
        let category = row.value(spec.column);
        observed.insert(category.clone());
        groups
            .entry(key)
            .or_default()
            .entry(category)
            .or_default()
            .push(row.value(spec.value));
    }

    if groups.is_empty() {
        tracing::debug!(table = %spec.table_id(), "pivot input is empty");
        return PivotResult::empty(spec);
    }

    let columns = order_columns(observed);
    let mut column_totals = vec![0u64; columns.len()];
    let mut pivot_rows = Vec::with_capacity(groups.len() + 1);

    for (key, by_category) in groups {
        let counts: Vec<u64> = columns
            .iter()
            .map(|c| {
                by_category
                    .get(c)
                    .map(|values| count_values(values, spec.aggregate))
                    .unwrap_or(0)
            })
            .collect();
        for (total, count) in column_totals.iter_mut().zip(&counts) {
            *total += count;
        }
        pivot_rows.push(build_row(RowKey::Group(key), &counts));
    }
    pivot_rows.push(build_row(RowKey::GrandTotal, &column_totals));

    tracing::debug!(
        table = %spec.table_id(),
        groups = pivot_rows.len() - 1,
        columns = columns.len(),
        "built pivot"
    );

    PivotResult {
        index: spec.index.clone(),
        column_field: spec.column,
        columns,
        rows: pivot_rows,
    }
}

fn build_row(key: RowKey, counts: &[u64]) -> PivotRow {
    let total: u64 = counts.iter().sum();
    PivotRow {
        key,
        cells: counts.iter().map(|&c| PivotCell::new(c, total)).collect(),
        total,
    }
}

fn count_values(values: &[String], aggregate: Aggregate) -> u64 {
    match aggregate {
        Aggregate::Count => values.len() as u64,
        Aggregate::CountDistinct => values.iter().collect::<BTreeSet<_>>().len() as u64,
    }
}

/// Preferred status columns first, then the remaining categories sorted.
fn order_columns(observed: BTreeSet<String>) -> Vec<String> {
    let mut ordered: Vec<String> = STATUS_COLUMN_ORDER
        .iter()
        .filter(|s| observed.contains(**s))
        .map(|s| s.to_string())
        .collect();
    ordered.extend(
        observed
            .into_iter()
            .filter(|c| !STATUS_COLUMN_ORDER.contains(&c.as_str())),
    );
    ordered
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole numbers keep one decimal (`100.0`), others print as rounded.
fn format_percentage(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
