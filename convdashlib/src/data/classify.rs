//! Row classification: derive status, outcome and category labels.
//!
//! Classification is a pure function of record content. Each raw record
//! yields exactly one [`ClassifiedRow`], in input order; identifiers and
//! status codes are copied through untouched.
//!
//! The conversion status is decided by [`CONVERSION_RULES`], an ordered table
//! evaluated first-match. The predicates overlap (a cancelled booking can also
//! carry a completed service status), so the table order is the tie-breaker.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::query::{GRAND_TOTAL, TOTAL_LEADS};

use super::record::RawRecord;
use super::row::{ClassifiedRow, StatusCodes};

/// Comments that mark a booking as cancelled by the customer or as noise.
pub const CANCELLATION_COMMENTS: &[&str] = &[
    "Customer called for a status update",
    "Done with Local shop",
    "Duplicate Booking",
    "Just Enquiry/checking the App",
    "Just for Quotation",
    "Post Service Escalationn",
    "Price not satisfied/Quotes are too high",
    "Testing",
    "Wrong Number",
];

/// Comments that mark a booking the customer declined or could not be served.
pub const DECLINE_COMMENTS: &[&str] = &[
    "All RNRs are exhausted",
    "Currentlyservice is not needed",
    "Not in Chennai/Bangalore/Hyderabad/Trichy",
    "Not Interested",
    "Reminded in Whatsapp Images not received",
    "Vehicle Sold / No Vehicle",
];

/// Category prefix that collapses the whole category to [`JD_CATEGORY`].
pub const JD_MARKER: &str = "JD -";
pub const JD_CATEGORY: &str = "JD Category";
/// Category used when the record carries none.
pub const DEFAULT_CATEGORY: &str = "Follow up";

pub const NO_CITY: &str = "No City Available";
pub const NO_SERVICE: &str = "No Service Available";
pub const NO_NAME: &str = "No Name Available";
pub const NO_SOURCE: &str = "No Source Available";
pub const NO_OUTLET: &str = "No Outlet Available";
pub const UNKNOWN_COMMENT: &str = "Unknown Status";
/// Appended to a data value that would read as a pivot margin label.
pub const RESERVED_LABEL_SUFFIX: &str = " (value)";

static CATEGORY_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*-\s*").expect("Invalid category prefix regex"));

/// Outcome of the operator's last activity on a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityOutcome {
    #[serde(rename = "Cancelled Booking")]
    CancelledBooking,
    #[serde(rename = "Other Booking")]
    OtherBooking,
    #[serde(rename = "Unknown Status")]
    Unknown,
}

impl ActivityOutcome {
    pub fn label(self) -> &'static str {
        match self {
            ActivityOutcome::CancelledBooking => "Cancelled Booking",
            ActivityOutcome::OtherBooking => "Other Booking",
            ActivityOutcome::Unknown => "Unknown Status",
        }
    }
}

impl fmt::Display for ActivityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Conversion status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionStatus {
    Cancelled,
    Duplicate,
    Goaxled,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Idle,
    Others,
    #[serde(rename = "Unknown Status")]
    Unknown,
}

impl ConversionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConversionStatus::Cancelled => "Cancelled",
            ConversionStatus::Duplicate => "Duplicate",
            ConversionStatus::Goaxled => "Goaxled",
            ConversionStatus::FollowUp => "Follow-up",
            ConversionStatus::Idle => "Idle",
            ConversionStatus::Others => "Others",
            ConversionStatus::Unknown => "Unknown Status",
        }
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Collapsed vehicle class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    #[serde(rename = "2-wheel")]
    TwoWheel,
    #[serde(rename = "4-wheel")]
    FourWheel,
    Other,
}

impl VehicleClass {
    pub fn label(self) -> &'static str {
        match self {
            VehicleClass::TwoWheel => "2-wheel",
            VehicleClass::FourWheel => "4-wheel",
            VehicleClass::Other => "Other",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of the conversion status table.
#[derive(Debug, Clone, Copy)]
pub struct StatusRule {
    pub status: ConversionStatus,
    /// Human-readable form of the predicate
    pub condition: &'static str,
    pub matches: fn(&StatusCodes) -> bool,
}

/// Conversion status rules, highest priority first.
pub const CONVERSION_RULES: [StatusRule; 6] = [
    StatusRule {
        status: ConversionStatus::Cancelled,
        condition: "flag == 1",
        matches: is_cancelled,
    },
    StatusRule {
        status: ConversionStatus::Duplicate,
        condition: "flag_unwntd == 1",
        matches: is_duplicate,
    },
    StatusRule {
        status: ConversionStatus::Goaxled,
        condition: "(booking_status_code == 2 && axle_flag == 1 && flag == 0) || service_status_code == Completed",
        matches: is_goaxled,
    },
    StatusRule {
        status: ConversionStatus::FollowUp,
        condition: "booking_status_code in {3,4,5,6} && flag == 0",
        matches: is_follow_up,
    },
    StatusRule {
        status: ConversionStatus::Idle,
        condition: "booking_status_code == 1 && flag == 0",
        matches: is_idle,
    },
    StatusRule {
        status: ConversionStatus::Others,
        condition: "booking_status_code == 0 && flag != 1",
        matches: is_other,
    },
];

/// Booking status codes that count as an open follow-up.
pub const FOLLOW_UP_CODES: [i64; 4] = [3, 4, 5, 6];

fn is_cancelled(c: &StatusCodes) -> bool {
    c.flag == 1
}

fn is_duplicate(c: &StatusCodes) -> bool {
    c.flag_unwntd == 1
}

fn is_goaxled(c: &StatusCodes) -> bool {
    (c.booking_status_code == 2 && c.axle_flag == 1 && c.flag == 0)
        || c.service_status_code == "Completed"
}

fn is_follow_up(c: &StatusCodes) -> bool {
    FOLLOW_UP_CODES.contains(&c.booking_status_code) && c.flag == 0
}

fn is_idle(c: &StatusCodes) -> bool {
    c.booking_status_code == 1 && c.flag == 0
}

fn is_other(c: &StatusCodes) -> bool {
    c.booking_status_code == 0 && c.flag != 1
}

/// Classify a sequence of raw records.
pub fn classify(records: &[RawRecord]) -> Vec<ClassifiedRow> {
    records.iter().map(classify_record).collect()
}

/// Classify a single raw record.
pub fn classify_record(record: &RawRecord) -> ClassifiedRow {
    let codes = StatusCodes::from_record(record);
    let comments = normalize_text(&record.comments, UNKNOWN_COMMENT);

    ClassifiedRow {
        booking_id: record.booking_id,
        raw_log_timestamp: record.raw_log_timestamp,
        booking_date: record.booking_date(),
        city: normalize_city(&record.city),
        vehicle_type: normalize_vehicle_type(&record.vehicle_type),
        service_type: normalize_text(&record.service_type, NO_SERVICE),
        master_service: normalize_text(&record.master_service, NO_SERVICE),
        user_source: normalize_text(&record.user_source, NO_SOURCE),
        crm_admin_name: normalize_text(&record.crm_admin_name, NO_NAME),
        b2b_shop_name: normalize_text(&record.b2b_shop_name, NO_OUTLET),
        activity_outcome: activity_outcome(&comments),
        comments,
        cleaned_category: clean_category(&record.category),
        conversion_status: conversion_status(&codes),
        codes,
    }
}

/// Outcome for an already-normalized comment. Matching is exact membership.
pub fn activity_outcome(comment: &str) -> ActivityOutcome {
    if CANCELLATION_COMMENTS.contains(&comment) {
        ActivityOutcome::CancelledBooking
    } else if DECLINE_COMMENTS.contains(&comment) {
        ActivityOutcome::OtherBooking
    } else {
        ActivityOutcome::Unknown
    }
}

/// First matching rule of [`CONVERSION_RULES`], or `Unknown`.
pub fn conversion_status(codes: &StatusCodes) -> ConversionStatus {
    CONVERSION_RULES
        .iter()
        .find(|rule| (rule.matches)(codes))
        .map(|rule| rule.status)
        .unwrap_or(ConversionStatus::Unknown)
}

/// Empty strings and stray numbers (export fill values) carry no information.
fn is_placeholder(value: &str) -> bool {
    value.is_empty() || value.parse::<f64>().is_ok()
}

/// Keep data values distinct from the Grand Total labels, so a group
/// named "Grand Total" still addresses its own row and column.
pub fn escape_reserved(label: String) -> String {
    if label.eq_ignore_ascii_case(GRAND_TOTAL) || label.eq_ignore_ascii_case(TOTAL_LEADS) {
        label + RESERVED_LABEL_SUFFIX
    } else {
        label
    }
}

/// Trim, replacing placeholder values with `sentinel`.
pub fn normalize_text(value: &str, sentinel: &str) -> String {
    let trimmed = value.trim();
    if is_placeholder(trimmed) {
        sentinel.to_string()
    } else {
        escape_reserved(trimmed.to_string())
    }
}

/// Trim and title-case a city name.
pub fn normalize_city(value: &str) -> String {
    let trimmed = value.trim();
    if is_placeholder(trimmed) {
        return NO_CITY.to_string();
    }
    let city = trimmed
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ");
    escape_reserved(city)
}

/// Collapse free-text vehicle types into a [`VehicleClass`].
pub fn normalize_vehicle_type(value: &str) -> VehicleClass {
    match value.trim().to_lowercase().as_str() {
        "2w" | "2-wheel" | "2 wheeler" | "2-wheeler" | "two wheeler" | "bike" => {
            VehicleClass::TwoWheel
        }
        "4w" | "4-wheel" | "4 wheeler" | "4-wheeler" | "four wheeler" | "car" => {
            VehicleClass::FourWheel
        }
        _ => VehicleClass::Other,
    }
}

/// Strip the leading "<number> - " from a category, collapsing JD categories.
pub fn clean_category(value: &str) -> String {
    let trimmed = value.trim();
    if is_placeholder(trimmed) {
        return DEFAULT_CATEGORY.to_string();
    }
    if trimmed.starts_with(JD_MARKER) {
        return JD_CATEGORY.to_string();
    }
    escape_reserved(CATEGORY_PREFIX.replace(trimmed, "").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(record: RawRecord) -> ConversionStatus {
        classify_record(&record).conversion_status
    }

    #[test]
    fn test_scenario_idle_others_duplicate() {
        let records = vec![
            RawRecord::new(1).with_booking_status(1).with_flag(0),
            RawRecord::new(2).with_booking_status(0).with_flag(0),
            RawRecord::new(3).with_unwanted_flag(1),
        ];
        let statuses: Vec<&str> = classify(&records)
            .iter()
            .map(|r| r.conversion_status.label())
            .collect();
        assert_eq!(statuses, vec!["Idle", "Others", "Duplicate"]);
    }

    #[test]
    fn test_first_rule_wins_over_later_match() {
        // Satisfies P1 (flag) and P3 (completed service)
        let record = RawRecord::new(1)
            .with_flag(1)
            .with_service_status("Completed");
        assert_eq!(status_of(record), ConversionStatus::Cancelled);

        // Satisfies P2 and P4
        let record = RawRecord::new(2)
            .with_unwanted_flag(1)
            .with_booking_status(4)
            .with_flag(0);
        assert_eq!(status_of(record), ConversionStatus::Duplicate);
    }

    #[test]
    fn test_rule_table_order() {
        let order: Vec<ConversionStatus> = CONVERSION_RULES.iter().map(|r| r.status).collect();
        assert_eq!(
            order,
            vec![
                ConversionStatus::Cancelled,
                ConversionStatus::Duplicate,
                ConversionStatus::Goaxled,
                ConversionStatus::FollowUp,
                ConversionStatus::Idle,
                ConversionStatus::Others,
            ]
        );
    }

    #[test]
    fn test_goaxled_variants() {
        let handed_off = RawRecord::new(1)
            .with_booking_status(2)
            .with_axle_flag(1)
            .with_flag(0);
        assert_eq!(status_of(handed_off), ConversionStatus::Goaxled);

        let completed = RawRecord::new(2)
            .with_booking_status(9)
            .with_service_status("Completed");
        assert_eq!(status_of(completed), ConversionStatus::Goaxled);

        // Status 2 without the axle flag matches nothing
        let not_axled = RawRecord::new(3).with_booking_status(2);
        assert_eq!(status_of(not_axled), ConversionStatus::Unknown);
    }

    #[test]
    fn test_follow_up_codes() {
        for code in FOLLOW_UP_CODES {
            let record = RawRecord::new(code).with_booking_status(code);
            assert_eq!(status_of(record), ConversionStatus::FollowUp);
        }
        assert_eq!(
            status_of(RawRecord::new(7).with_booking_status(7)),
            ConversionStatus::Unknown
        );
    }

    #[test]
    fn test_float_formatted_flag_is_cancelled() {
        let data = "booking_id,booking_status_code,flag\n9,1.0,1.0\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let record: RawRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(status_of(record), ConversionStatus::Cancelled);
    }

    #[test]
    fn test_missing_codes_read_as_zero() {
        // booking_status_code defaults to 0, flag to 0 -> Others
        assert_eq!(status_of(RawRecord::new(1)), ConversionStatus::Others);
    }

    #[test]
    fn test_activity_outcome_exact_membership() {
        assert_eq!(
            activity_outcome("Wrong Number"),
            ActivityOutcome::CancelledBooking
        );
        assert_eq!(
            activity_outcome("Not Interested"),
            ActivityOutcome::OtherBooking
        );
        // Substrings do not match
        assert_eq!(
            activity_outcome("Wrong Number given twice"),
            ActivityOutcome::Unknown
        );
        assert_eq!(activity_outcome("wrong number"), ActivityOutcome::Unknown);
    }

    #[test]
    fn test_comment_is_trimmed_before_matching() {
        let row = classify_record(&RawRecord::new(1).with_comments("All RNRs are exhausted "));
        assert_eq!(row.comments, "All RNRs are exhausted");
        assert_eq!(row.activity_outcome, ActivityOutcome::OtherBooking);

        let row = classify_record(&RawRecord::new(2).with_comments("0"));
        assert_eq!(row.comments, UNKNOWN_COMMENT);
        assert_eq!(row.activity_outcome, ActivityOutcome::Unknown);
    }

    #[test]
    fn test_keyword_sets_are_disjoint() {
        for comment in CANCELLATION_COMMENTS {
            assert!(!DECLINE_COMMENTS.contains(comment));
        }
    }

    #[test]
    fn test_text_sentinels_per_field() {
        let row = classify_record(
            &RawRecord::new(1)
                .with_city(" ")
                .with_master_service("0")
                .with_person("")
                .with_source("12")
                .with_outlet(""),
        );
        assert_eq!(row.city, NO_CITY);
        assert_eq!(row.master_service, NO_SERVICE);
        assert_eq!(row.service_type, NO_SERVICE);
        assert_eq!(row.crm_admin_name, NO_NAME);
        assert_eq!(row.user_source, NO_SOURCE);
        assert_eq!(row.b2b_shop_name, NO_OUTLET);
    }

    #[test]
    fn test_margin_labels_are_escaped() {
        let row = classify_record(
            &RawRecord::new(1)
                .with_master_service("Grand Total")
                .with_city("grand total")
                .with_category("4 - Total Leads"),
        );
        assert_eq!(row.master_service, "Grand Total (value)");
        assert_eq!(row.city, "Grand Total (value)");
        assert_eq!(row.cleaned_category, "Total Leads (value)");
        assert_eq!(escape_reserved("Grand Totals".to_string()), "Grand Totals");
    }

    #[test]
    fn test_city_is_title_cased() {
        assert_eq!(normalize_city("  chennai "), "Chennai");
        assert_eq!(normalize_city("NEW   delhi"), "New Delhi");
    }

    #[test]
    fn test_vehicle_type_normalization() {
        assert_eq!(normalize_vehicle_type(" 2W "), VehicleClass::TwoWheel);
        assert_eq!(normalize_vehicle_type("Bike"), VehicleClass::TwoWheel);
        assert_eq!(normalize_vehicle_type("4w"), VehicleClass::FourWheel);
        assert_eq!(normalize_vehicle_type("Car"), VehicleClass::FourWheel);
        assert_eq!(normalize_vehicle_type("pv"), VehicleClass::Other);
        assert_eq!(normalize_vehicle_type(""), VehicleClass::Other);
    }

    #[test]
    fn test_clean_category() {
        assert_eq!(clean_category("3690262 - Pickup pending"), "Pickup pending");
        assert_eq!(clean_category("12-Callback"), "Callback");
        assert_eq!(clean_category("JD - 3690262 - anything"), JD_CATEGORY);
        assert_eq!(clean_category("Price check"), "Price check");
        assert_eq!(clean_category(""), DEFAULT_CATEGORY);
        assert_eq!(clean_category("0"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_classify_preserves_order_and_identifiers() {
        let records: Vec<RawRecord> = (10..15).map(RawRecord::new).collect();
        let rows = classify(&records);
        let ids: Vec<i64> = rows.iter().map(|r| r.booking_id).collect();
        assert_eq!(ids, vec![10, 11, 12, 13, 14]);
    }
}
