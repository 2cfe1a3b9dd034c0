//! Pivot configuration.
//!
//! This module contains the types that control how a pivot is built:
//! which fields form the index, which field supplies the columns, how
//! values are counted, and which rows are considered at all.

use serde::{Deserialize, Serialize};

use crate::data::Field;

use super::predicate::{Condition, Predicate};

/// Label of the margin row and column.
pub const GRAND_TOTAL: &str = "Grand Total";

/// Display name of the Grand Total column.
pub const TOTAL_LEADS: &str = "Total Leads";

/// Preferred order of status columns, after the Grand Total column.
pub const STATUS_COLUMN_ORDER: [&str; 6] = [
    "Goaxled",
    "Follow-up",
    "Cancelled",
    "Others",
    "Idle",
    "Duplicate",
];

/// How values are counted inside a pivot cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Aggregate {
    /// Number of rows
    Count,
    /// Number of distinct values of the value field
    #[default]
    CountDistinct,
}

/// Definition of a pivot table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotSpec {
    /// Fields forming the (composite) row key
    pub index: Vec<Field>,
    /// Field whose distinct values become columns
    pub column: Field,
    /// Field whose values are counted
    pub value: Field,
    /// Counting mode
    pub aggregate: Aggregate,
    /// Rows outside this predicate never reach the pivot
    pub predicate: Predicate,
    /// Distinguishes variants that share index and column fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl PivotSpec {
    /// Count distinct booking ids by `index` against `column`.
    pub fn new(index: Vec<Field>, column: Field) -> Self {
        Self {
            index,
            column,
            value: Field::BookingId,
            aggregate: Aggregate::default(),
            predicate: Predicate::new(),
            suffix: None,
        }
    }

    /// Builder: set the counted field.
    pub fn value(mut self, field: Field) -> Self {
        self.value = field;
        self
    }

    /// Builder: set the counting mode.
    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// Builder: restrict input rows by an additional condition.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.predicate = self.predicate.and(condition);
        self
    }

    /// Builder: set the variant suffix.
    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }

    /// Stable identifier of the rendered table, e.g. `pivot-table-master_service`.
    pub fn table_id(&self) -> String {
        let index: Vec<&str> = self.index.iter().map(|f| f.id()).collect();
        let mut id = format!("pivot-table-{}", index.join("-"));
        if let Some(suffix) = &self.suffix {
            id.push('-');
            id.push_str(suffix);
        }
        id
    }
}
