//! Reconstruct the detail rows behind a pivot cell.

use serde::{Deserialize, Serialize};

use crate::data::{ClassifiedRow, Field};
use crate::output::{Table, SERIAL_COLUMN};
use crate::query::{ColumnKey, Condition, PivotSpec, Predicate, RowKey};

use super::cell::CellRef;

pub const NO_DATA_MESSAGE: &str = "No Data Found";
pub const NO_MATCH_MESSAGE: &str = "No Matching Records Found";

/// Which predicates a Grand Total row or column drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrandTotalScope {
    /// Grand Total row drops the row conditions, Grand Total column drops the
    /// column condition, each independently.
    #[default]
    PerAxis,
    /// Either Grand Total drops both row and column conditions.
    Conflated,
}

/// Drill-down configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrilldownOptions {
    pub grand_total_scope: GrandTotalScope,
}

impl DrilldownOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set how Grand Total cells widen the selection.
    pub fn grand_total_scope(mut self, scope: GrandTotalScope) -> Self {
        self.grand_total_scope = scope;
        self
    }
}

/// One numbered detail row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    /// 1-based position in the result
    pub serial: usize,
    pub row: ClassifiedRow,
}

/// Detail rows projected onto a view's columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrilldownRows {
    pub columns: Vec<Field>,
    pub rows: Vec<DetailRow>,
}

impl DrilldownRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serial number column followed by the projected fields.
    pub fn to_table(&self) -> Table {
        let columns = std::iter::once(SERIAL_COLUMN.to_string())
            .chain(self.columns.iter().map(|f| f.id().to_string()))
            .collect();
        let mut table = Table::new(columns);
        for detail in &self.rows {
            let values = std::iter::once(detail.serial.to_string())
                .chain(self.columns.iter().map(|f| detail.row.value(*f)))
                .collect();
            table.push_row(values);
        }
        table
    }
}

/// Result of resolving a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DrilldownOutcome {
    /// The cell's count is zero or unreadable
    NoData,
    /// The cell promised rows but the reconstructed filter found none
    NoMatchingRecords { expected: u64 },
    Rows(DrilldownRows),
}

impl DrilldownOutcome {
    /// User-facing message for the sentinel outcomes.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            DrilldownOutcome::NoData => Some(NO_DATA_MESSAGE),
            DrilldownOutcome::NoMatchingRecords { .. } => Some(NO_MATCH_MESSAGE),
            DrilldownOutcome::Rows(_) => None,
        }
    }
}

/// The conjunction that selects a cell's rows: the pivot's own predicate,
/// one equality per index field, and the column category. Row conditions
/// the pivot predicate already carries are not repeated.
pub fn build_predicate(cell: &CellRef, spec: &PivotSpec, options: &DrilldownOptions) -> Predicate {
    let (skip_row, skip_column) = match options.grand_total_scope {
        GrandTotalScope::PerAxis => (cell.row.is_grand_total(), cell.column.is_grand_total()),
        GrandTotalScope::Conflated => {
            let either = cell.row.is_grand_total() || cell.column.is_grand_total();
            (either, either)
        }
    };

    let mut predicate = Predicate::new().and_all(&spec.predicate);
    if !skip_row {
        if let RowKey::Group(values) = &cell.row {
            for (field, value) in spec.index.iter().zip(values) {
                let condition = Condition::eq(*field, value.clone());
                if !spec.predicate.conditions.contains(&condition) {
                    predicate = predicate.and(condition);
                }
            }
        }
    }
    if !skip_column {
        if let ColumnKey::Category(category) = &cell.column {
            predicate = predicate.and(Condition::eq(spec.column, category.clone()));
        }
    }
    predicate
}

/// Resolve a clicked cell against the rows the pivot was built from.
pub fn resolve(
    cell: &CellRef,
    spec: &PivotSpec,
    rows: &[ClassifiedRow],
    columns: &[Field],
    options: &DrilldownOptions,
) -> DrilldownOutcome {
    let expected = cell.count();
    if expected == 0 {
        tracing::debug!(value = %cell.value, "cell holds no rows");
        return DrilldownOutcome::NoData;
    }

    let predicate = build_predicate(cell, spec, options);
    let matched = predicate.apply(rows);

    if matched.is_empty() {
        tracing::warn!(
            table = %spec.table_id(),
            row = %cell.row,
            column = %cell.column.id(),
            expected,
            predicate = %predicate,
            "drill-down matched no records"
        );
        return DrilldownOutcome::NoMatchingRecords { expected };
    }
    if matched.len() as u64 != expected {
        tracing::warn!(
            table = %spec.table_id(),
            row = %cell.row,
            column = %cell.column.id(),
            expected,
            resolved = matched.len(),
            "drill-down count differs from cell"
        );
    }

    DrilldownOutcome::Rows(DrilldownRows {
        columns: columns.to_vec(),
        rows: matched
            .into_iter()
            .enumerate()
            .map(|(i, row)| DetailRow { serial: i + 1, row })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{classify, RawRecord};
    use crate::query::{aggregate, PivotView};

    fn sample_rows() -> Vec<ClassifiedRow> {
        classify(&[
            RawRecord::new(1)
                .with_master_service("Wash")
                .with_booking_status(2)
                .with_axle_flag(1),
            RawRecord::new(2)
                .with_master_service("Wash")
                .with_booking_status(1),
            RawRecord::new(3)
                .with_master_service("Repair")
                .with_booking_status(2)
                .with_axle_flag(1),
            RawRecord::new(4)
                .with_master_service("Repair")
                .with_flag(1),
        ])
    }

    fn ids(outcome: &DrilldownOutcome) -> Vec<i64> {
        match outcome {
            DrilldownOutcome::Rows(rows) => rows.rows.iter().map(|d| d.row.booking_id).collect(),
            other => panic!("expected rows, got {:?}", other),
        }
    }

    fn drill(row: RowKey, column: &str, options: DrilldownOptions) -> DrilldownOutcome {
        let rows = sample_rows();
        let view = PivotView::Service;
        let spec = view.spec();
        let pivot = aggregate(&rows, &spec);
        let cell = CellRef::from_pivot(&pivot, row, ColumnKey::parse(column));
        resolve(&cell, &spec, &rows, &view.detail_columns(), &options)
    }

    #[test]
    fn test_zero_cell_is_no_data() {
        let rows = sample_rows();
        let spec = PivotView::Service.spec();
        let cell = CellRef::new(
            RowKey::from_values(["Wash"]),
            ColumnKey::parse("Cancelled"),
            "0 (0%)",
        );
        let outcome = resolve(&cell, &spec, &rows, &[], &DrilldownOptions::new());
        assert_eq!(outcome, DrilldownOutcome::NoData);
        assert_eq!(outcome.message(), Some("No Data Found"));
    }

    #[test]
    fn test_malformed_value_is_no_data() {
        let rows = sample_rows();
        let spec = PivotView::Service.spec();
        let cell = CellRef::new(RowKey::GrandTotal, ColumnKey::GrandTotal, "n/a");
        let outcome = resolve(&cell, &spec, &rows, &[], &DrilldownOptions::new());
        assert_eq!(outcome, DrilldownOutcome::NoData);
    }

    #[test]
    fn test_single_cell_resolves_its_rows() {
        let outcome = drill(
            RowKey::from_values(["Wash"]),
            "Goaxled",
            DrilldownOptions::new(),
        );
        assert_eq!(ids(&outcome), vec![1]);
    }

    #[test]
    fn test_grand_total_both_axes_returns_full_set() {
        let outcome = drill(RowKey::GrandTotal, "Grand Total", DrilldownOptions::new());
        assert_eq!(ids(&outcome), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_per_axis_grand_total_row_keeps_column() {
        let outcome = drill(RowKey::GrandTotal, "Goaxled", DrilldownOptions::new());
        assert_eq!(ids(&outcome), vec![1, 3]);
    }

    #[test]
    fn test_per_axis_grand_total_column_keeps_row() {
        let outcome = drill(
            RowKey::from_values(["Repair"]),
            "Total Leads",
            DrilldownOptions::new(),
        );
        assert_eq!(ids(&outcome), vec![3, 4]);
    }

    #[test]
    fn test_conflated_grand_total_drops_both_axes() {
        let options = DrilldownOptions::new().grand_total_scope(GrandTotalScope::Conflated);
        let outcome = drill(RowKey::GrandTotal, "Goaxled", options);
        assert_eq!(ids(&outcome), vec![1, 2, 3, 4]);

        let outcome = drill(RowKey::from_values(["Repair"]), "Grand Total", options);
        assert_eq!(ids(&outcome), vec![1, 2, 3, 4]);

        let outcome = drill(RowKey::from_values(["Repair"]), "Goaxled", options);
        assert_eq!(ids(&outcome), vec![3]);
    }

    #[test]
    fn test_mismatch_is_no_matching_records() {
        let rows = sample_rows();
        let spec = PivotView::Service.spec();
        let cell = CellRef::new(
            RowKey::from_values(["Alignment"]),
            ColumnKey::parse("Goaxled"),
            "3 (100.0%)",
        );
        let outcome = resolve(&cell, &spec, &rows, &[], &DrilldownOptions::new());
        assert_eq!(outcome, DrilldownOutcome::NoMatchingRecords { expected: 3 });
        assert_eq!(outcome.message(), Some("No Matching Records Found"));
    }

    #[test]
    fn test_view_predicate_is_carried() {
        let rows = classify(&[
            RawRecord::new(1).with_comments("Wrong Number").with_vehicle_type("2w"),
            RawRecord::new(2).with_comments("Not Interested").with_vehicle_type("2w"),
        ]);
        let view = PivotView::Cancelled;
        let spec = view.spec();
        let pivot = aggregate(&rows, &spec);
        let cell = CellRef::from_pivot(&pivot, RowKey::GrandTotal, ColumnKey::GrandTotal);
        let outcome = resolve(
            &cell,
            &spec,
            &rows,
            &view.detail_columns(),
            &DrilldownOptions::new(),
        );
        assert_eq!(ids(&outcome), vec![1]);
    }

    #[test]
    fn test_rows_numbered_from_one() {
        let outcome = drill(RowKey::GrandTotal, "Grand Total", DrilldownOptions::new());
        let DrilldownOutcome::Rows(rows) = outcome else {
            panic!("expected rows");
        };
        let serials: Vec<usize> = rows.rows.iter().map(|d| d.serial).collect();
        assert_eq!(serials, vec![1, 2, 3, 4]);

        let table = rows.to_table();
        assert_eq!(
            table.columns,
            vec![
                "S.No",
                "booking_id",
                "raw_log_timestamp",
                "master_service",
                "vehicle_type",
                "b2b_shop_name",
                "crm_admin_name"
            ]
        );
        assert_eq!(table.rows[0][0], "1");
        assert_eq!(table.rows[0][1], "1");
        assert_eq!(table.rows[3][3], "Repair");
    }

    #[test]
    fn test_build_predicate_composite_key() {
        let spec = PivotView::Other.spec();
        let cell = CellRef::new(
            RowKey::from_values(["Other Booking", "Not Interested"]),
            ColumnKey::parse("2-wheel"),
            "1 (100.0%)",
        );
        let predicate = build_predicate(&cell, &spec, &DrilldownOptions::new());
        assert_eq!(
            predicate.to_string(),
            "activity_outcome == 'Other Booking' AND comments == 'Not Interested' \
             AND vehicle_type == '2-wheel'"
        );
    }

    #[test]
    fn test_group_named_grand_total_is_addressable() {
        let rows = classify(&[
            RawRecord::new(1)
                .with_master_service("Grand Total")
                .with_booking_status(1),
            RawRecord::new(2)
                .with_master_service("Wash")
                .with_booking_status(1),
        ]);
        let spec = PivotView::Service.spec();
        let pivot = aggregate(&rows, &spec);
        assert_eq!(pivot.rows.len(), 3);

        let key = RowKey::from_values(["Grand Total (value)"]);
        assert!(!key.is_grand_total());
        let cell = CellRef::from_pivot(&pivot, key, ColumnKey::GrandTotal);
        assert_eq!(cell.value, "1");

        match resolve(&cell, &spec, &rows, &[], &DrilldownOptions::new()) {
            DrilldownOutcome::Rows(found) => {
                assert_eq!(found.len(), 1);
                assert_eq!(found.rows[0].row.booking_id, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
