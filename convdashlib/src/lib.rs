//! # convdashlib
//!
//! A booking conversion reporting library: classify booking records, filter
//! them by facets, cross-tabulate them into pivots, and drill back from any
//! pivot cell to the bookings behind it.
//!
//! ## Overview
//!
//! The pipeline has five stages, each a module:
//!
//! - **source**: Fetch raw records for a date range (`CsvSource`, `load_dataset`)
//! - **data**: Classify records into conversion status, activity outcome,
//!   vehicle class and cleaned category (`classify`)
//! - **query**: Facet filters, pivot specs and aggregation (`FacetFilter`, `aggregate`)
//! - **drilldown**: Rebuild a cell's selection and return its rows (`resolve`)
//! - **output**: Tables and CSV export (`Table`, `to_delimited`)
//!
//! A [`Session`] ties them together for one user: it owns the classified
//! rows, the facet selection, and the filtered set every pivot and
//! drill-down reads.
//!
//! Every stage after the source is a pure function over owned values. Data
//! problems never surface as errors: an empty range yields a dataset notice,
//! and an unreadable or unmatched cell yields a drill-down sentinel.
//!
//! ## Example
//!
//! ```rust
//! use convdashlib::{
//!     CellRef, ColumnKey, Dataset, DateRange, DrilldownOptions, DrilldownOutcome,
//!     PivotView, RawRecord, RowKey, Session,
//! };
//! use chrono::NaiveDate;
//!
//! let range = DateRange {
//!     start: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!     end: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
//! };
//! let records = vec![
//!     RawRecord::new(1).with_master_service("Wash").with_booking_status(2).with_axle_flag(1),
//!     RawRecord::new(2).with_master_service("Wash").with_booking_status(1),
//! ];
//! let session = Session::new(Dataset::new(records, range));
//!
//! let pivot = session.pivot(PivotView::Service);
//! let cell = CellRef::from_pivot(&pivot, RowKey::from_values(["Wash"]), ColumnKey::parse("Goaxled"));
//! assert_eq!(cell.value, "1 (50.0%)");
//!
//! match session.drilldown(PivotView::Service, &cell, &DrilldownOptions::new()) {
//!     DrilldownOutcome::Rows(rows) => assert_eq!(rows.rows[0].row.booking_id, 1),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

pub mod data;
pub mod drilldown;
pub mod error;
pub mod output;
pub mod query;
pub mod session;
pub mod source;

pub use data::{
    classify, ActivityOutcome, ClassifiedRow, ConversionStatus, Field, RawRecord, VehicleClass,
};
pub use drilldown::{
    resolve, CellRef, DrilldownOptions, DrilldownOutcome, DrilldownRows, GrandTotalScope,
};
pub use error::ConvdashError;
pub use output::{to_delimited, ColumnLabels, Table};
pub use query::{
    aggregate, facet_options, ColumnKey, Facet, FacetFilter, PivotResult, PivotSpec, PivotView,
    Predicate, RowKey,
};
pub use session::Session;
pub use source::{
    load_dataset, CsvSource, DateRange, Dataset, Period, RecordSource, SourceOptions,
};

/// Result type for convdashlib operations
pub type Result<T> = std::result::Result<T, ConvdashError>;
