//! Classified booking rows.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::classify::{ActivityOutcome, ConversionStatus, VehicleClass};
use super::field::Field;
use super::record::RawRecord;

/// Display layout for timestamps in tables and exports.
pub const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

/// Numeric status inputs of the conversion rules, missing values read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCodes {
    pub booking_status_code: i64,
    pub flag: i64,
    pub flag_unwntd: i64,
    pub axle_flag: i64,
    pub service_status_code: String,
}

impl StatusCodes {
    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            booking_status_code: record.booking_status_code.unwrap_or(0),
            flag: record.flag.unwrap_or(0),
            flag_unwntd: record.flag_unwntd.unwrap_or(0),
            axle_flag: record.axle_flag.unwrap_or(0),
            service_status_code: record.service_status_code.trim().to_string(),
        }
    }
}

/// A booking row with normalized text and derived labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRow {
    pub booking_id: i64,
    pub raw_log_timestamp: Option<NaiveDateTime>,
    pub booking_date: Option<NaiveDate>,
    pub city: String,
    pub vehicle_type: VehicleClass,
    pub service_type: String,
    pub master_service: String,
    pub user_source: String,
    pub crm_admin_name: String,
    pub b2b_shop_name: String,
    pub comments: String,
    pub cleaned_category: String,
    pub activity_outcome: ActivityOutcome,
    pub conversion_status: ConversionStatus,
    #[serde(flatten)]
    pub codes: StatusCodes,
}

impl ClassifiedRow {
    /// String value of a column, as shown in tables and compared by predicates.
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::BookingId => self.booking_id.to_string(),
            Field::Timestamp => self
                .raw_log_timestamp
                .map(|ts| ts.format(TIMESTAMP_DISPLAY).to_string())
                .unwrap_or_default(),
            Field::BookingDate => self
                .booking_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            Field::City => self.city.clone(),
            Field::VehicleType => self.vehicle_type.label().to_string(),
            Field::ServiceType => self.service_type.clone(),
            Field::MasterService => self.master_service.clone(),
            Field::Source => self.user_source.clone(),
            Field::Person => self.crm_admin_name.clone(),
            Field::Outlet => self.b2b_shop_name.clone(),
            Field::Comments => self.comments.clone(),
            Field::Category => self.cleaned_category.clone(),
            Field::ActivityOutcome => self.activity_outcome.label().to_string(),
            Field::ConversionStatus => self.conversion_status.label().to_string(),
            Field::BookingStatusCode => self.codes.booking_status_code.to_string(),
            Field::Flag => self.codes.flag.to_string(),
            Field::UnwantedFlag => self.codes.flag_unwntd.to_string(),
            Field::AxleFlag => self.codes.axle_flag.to_string(),
            Field::ServiceStatus => self.codes.service_status_code.clone(),
        }
    }
}
