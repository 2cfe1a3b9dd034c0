//! Output formatting: present results as tables and CSV.
//!
//! This module handles the final stage of the pipeline - formatting pivot
//! and drill-down results for display and export. It provides:
//!
//! - **Table**: Column ids plus formatted rows
//! - **ColumnLabels**: Display names for pivot and detail columns
//! - **Export**: CSV serialization with display-name headers
//!
//! Table is a pure presentation layer - it only formats data into strings.
//! All filtering, counting, and resolution happens in earlier stages.
//!
//! ## Example
//!
//! ```rust
//! use convdashlib::data::{classify, RawRecord};
//! use convdashlib::output::{to_delimited, ColumnLabels, Table};
//! use convdashlib::query::{aggregate, PivotView};
//!
//! let rows = classify(&[RawRecord::new(1).with_master_service("Wash").with_booking_status(1)]);
//! let table = Table::from_pivot(&aggregate(&rows, &PivotView::Service.spec()));
//! let csv = to_delimited(&table, &ColumnLabels::pivot()).unwrap();
//! assert!(csv.starts_with("Service,Total Leads,Idle"));
//! ```

pub mod export;
pub mod table;

pub use export::{to_delimited, write_delimited};
pub use table::{ColumnLabels, Table, SERIAL_COLUMN};
