//! Drill-down: from a clicked pivot cell back to the bookings under it.
//!
//! The resolver rebuilds the cell's selection as a declarative
//! [`Predicate`](crate::query::Predicate) from three parts:
//!
//! - the pivot's own predicate (e.g. the follow-up status codes),
//! - one equality per index field, unless the row is the Grand Total row,
//! - the column category equality, unless the column is Grand Total.
//!
//! How a Grand Total on one axis affects the other is set by
//! [`GrandTotalScope`]. Sentinel outcomes replace errors: a zero or
//! unreadable count is [`DrilldownOutcome::NoData`], and a non-zero count
//! that matches nothing is [`DrilldownOutcome::NoMatchingRecords`].

pub mod cell;
pub mod resolver;

pub use cell::{parse_cell_count, CellRef};
pub use resolver::{
    build_predicate, resolve, DetailRow, DrilldownOptions, DrilldownOutcome, DrilldownRows,
    GrandTotalScope, NO_DATA_MESSAGE, NO_MATCH_MESSAGE,
};
