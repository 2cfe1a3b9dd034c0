use convdashlib::data::{classify, ClassifiedRow, RawRecord};
use convdashlib::drilldown::{
    resolve, CellRef, DrilldownOptions, DrilldownOutcome, GrandTotalScope,
};
use convdashlib::query::{aggregate, Aggregate, ColumnKey, Facet, FacetFilter, PivotView, RowKey};
use proptest::prelude::*;

const SERVICES: &[&str] = &["Wash", "Repair", "Alignment", ""];
const CITIES: &[&str] = &["chennai", "Trichy", "BANGALORE", ""];
const VEHICLES: &[&str] = &["2w", "4w", "car", "truck", ""];
const PEOPLE: &[&str] = &["Asha", "Ravi", ""];
const SOURCES: &[&str] = &["App", "Web", "Walk-in"];
const COMMENTS: &[&str] = &[
    "Wrong Number",
    "Testing",
    "Not Interested",
    "Vehicle Sold / No Vehicle",
    "Call back later",
    "",
];
const CATEGORIES: &[&str] = &["1 - Price", "JD - Missed", "2-Timing", ""];

prop_compose! {
    fn arb_record()(
        id in 1i64..60,
        service in prop::sample::select(SERVICES),
        city in prop::sample::select(CITIES),
        vehicle in prop::sample::select(VEHICLES),
        person in prop::sample::select(PEOPLE),
        source in prop::sample::select(SOURCES),
        comment in prop::sample::select(COMMENTS),
        category in prop::sample::select(CATEGORIES),
        status in 0i64..8,
        flag in 0i64..2,
        unwanted in 0i64..2,
        axle in 0i64..2,
        completed in prop::bool::weighted(0.1),
    ) -> RawRecord {
        let record = RawRecord::new(id)
            .with_master_service(service)
            .with_city(city)
            .with_vehicle_type(vehicle)
            .with_person(person)
            .with_source(source)
            .with_comments(comment)
            .with_category(category)
            .with_booking_status(status)
            .with_flag(flag)
            .with_unwanted_flag(unwanted)
            .with_axle_flag(axle);
        if completed {
            record.with_service_status("Completed")
        } else {
            record
        }
    }
}

fn arb_rows() -> impl Strategy<Value = Vec<ClassifiedRow>> {
    prop::collection::vec(arb_record(), 0..80).prop_map(|records| classify(&records))
}

fn arb_view() -> impl Strategy<Value = PivotView> {
    prop::sample::select(PivotView::ALL.to_vec())
}

fn resolved_ids(outcome: &DrilldownOutcome) -> Vec<i64> {
    match outcome {
        DrilldownOutcome::Rows(rows) => rows.rows.iter().map(|d| d.row.booking_id).collect(),
        _ => Vec::new(),
    }
}

proptest! {
    #[test]
    fn test_row_totals_equal_sum_of_cells(rows in arb_rows(), view in arb_view()) {
        let pivot = aggregate(&rows, &view.spec());
        for row in &pivot.rows {
            let sum: u64 = row.cells.iter().map(|c| c.count).sum();
            prop_assert_eq!(row.total, sum);
        }
    }

    #[test]
    fn test_grand_total_row_sums_groups(rows in arb_rows(), view in arb_view()) {
        let pivot = aggregate(&rows, &view.spec());
        if let Some(grand_total) = pivot.grand_total() {
            for (i, cell) in grand_total.cells.iter().enumerate() {
                let sum: u64 = pivot.data_rows().iter().map(|r| r.cells[i].count).sum();
                prop_assert_eq!(cell.count, sum);
            }
        } else {
            prop_assert!(pivot.is_empty());
        }
    }

    #[test]
    fn test_row_percentages_sum_to_hundred(rows in arb_rows(), view in arb_view()) {
        let pivot = aggregate(&rows, &view.spec());
        for row in pivot.rows.iter().filter(|r| r.total > 0) {
            let sum: f64 = row.cells.iter().map(|c| c.percentage).sum();
            let slack = 0.005 * row.cells.len() as f64 + 1e-9;
            prop_assert!((sum - 100.0).abs() <= slack, "percentages sum to {}", sum);
        }
    }

    #[test]
    fn test_facet_filter_is_idempotent(
        rows in arb_rows(),
        cities in prop::sample::subsequence(vec!["Chennai", "Trichy", "Bangalore"], 0..=3),
        sources in prop::sample::subsequence(SOURCES.to_vec(), 0..=3),
    ) {
        let filter = FacetFilter::new()
            .select(Facet::City, cities)
            .select(Facet::Source, sources);
        let once = filter.apply(&rows);
        let twice = filter.apply(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.iter().all(|r| filter.matches(r)));
    }

    #[test]
    fn test_grand_total_drilldown_returns_pivot_input(rows in arb_rows(), view in arb_view()) {
        let spec = view.spec();
        let pivot = aggregate(&rows, &spec);
        let cell = CellRef::from_pivot(&pivot, RowKey::GrandTotal, ColumnKey::GrandTotal);
        let expected: Vec<i64> = spec.predicate.apply(&rows).iter().map(|r| r.booking_id).collect();

        for scope in [GrandTotalScope::PerAxis, GrandTotalScope::Conflated] {
            let options = DrilldownOptions::new().grand_total_scope(scope);
            let outcome = resolve(&cell, &spec, &rows, &view.detail_columns(), &options);
            prop_assert_eq!(resolved_ids(&outcome), expected.clone());
        }
    }

    #[test]
    fn test_counted_cells_resolve_to_their_rows(rows in arb_rows(), view in arb_view()) {
        let spec = view.spec().aggregate(Aggregate::Count);
        let pivot = aggregate(&rows, &spec);
        let options = DrilldownOptions::new();
        for row in &pivot.rows {
            for column in pivot.column_keys() {
                let expected = pivot.count(row, &column);
                let cell = CellRef::from_pivot(&pivot, row.key.clone(), column);
                let outcome = resolve(&cell, &spec, &rows, &[], &options);
                if expected == 0 {
                    prop_assert_eq!(outcome, DrilldownOutcome::NoData);
                } else {
                    prop_assert_eq!(resolved_ids(&outcome).len() as u64, expected);
                }
            }
        }
    }
}
