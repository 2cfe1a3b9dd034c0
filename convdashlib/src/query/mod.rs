//! Query processing: filter, pivot, and predicate building.
//!
//! This module handles the third stage of the pipeline - turning classified
//! rows into cross-tabulated results. It provides:
//!
//! - **Facets**: Set-membership filters chosen by the user (`FacetFilter`)
//! - **Predicates**: Declarative field/operator/value conditions (`Predicate`)
//! - **Options**: Pivot configuration (`PivotSpec`, `Aggregate`)
//! - **Pivot**: Grouped counts with percentages and margins (`PivotResult`)
//! - **Views**: The dashboard's fixed pivot catalogue (`PivotView`)
//!
//! ## Example
//!
//! ```rust
//! use convdashlib::data::{classify, RawRecord};
//! use convdashlib::query::{aggregate, Facet, FacetFilter, PivotView};
//!
//! let rows = classify(&[RawRecord::new(1).with_city("Chennai").with_booking_status(1)]);
//! let filtered = FacetFilter::new().select(Facet::City, ["Chennai"]).apply(&rows);
//! let pivot = aggregate(&filtered, &PivotView::Service.spec());
//! assert_eq!(pivot.grand_total().unwrap().total, 1);
//! ```

pub mod facets;
pub mod options;
pub mod pivot;
pub mod predicate;
pub mod views;

pub use facets::{facet_options, Facet, FacetFilter};
pub use options::{Aggregate, PivotSpec, GRAND_TOTAL, STATUS_COLUMN_ORDER, TOTAL_LEADS};
pub use pivot::{aggregate, ColumnKey, PivotCell, PivotResult, PivotRow, RowKey};
pub use predicate::{Condition, Operator, Predicate};
pub use views::PivotView;
