//! Booking data: raw records, classification, and classified rows.
//!
//! This module handles the second stage of the pipeline - turning raw
//! records delivered by a source into classified rows. It provides:
//!
//! - **Records**: The raw, unclassified shape (`RawRecord`)
//! - **Fields**: Column catalogue shared by every later stage (`Field`)
//! - **Classification**: Derived status, outcome, vehicle class and category
//!
//! ## Example
//!
//! ```rust
//! use convdashlib::data::{classify, RawRecord};
//!
//! let rows = classify(&[RawRecord::new(1).with_booking_status(1)]);
//! assert_eq!(rows[0].conversion_status.label(), "Idle");
//! ```

pub mod classify;
pub mod field;
pub mod record;
pub mod row;

pub use classify::{
    classify, classify_record, ActivityOutcome, ConversionStatus, StatusRule, VehicleClass,
    CONVERSION_RULES,
};
pub use field::Field;
pub use record::RawRecord;
pub use row::{ClassifiedRow, StatusCodes};
