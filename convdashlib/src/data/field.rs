//! Addressable columns of a classified booking row.
//!
//! Facets, pivot specs, drill-down predicates and export headers all refer to
//! row columns through [`Field`], so every consumer agrees on the machine id
//! of a column and on its human-readable names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvdashError;

/// A column of a [`ClassifiedRow`](super::row::ClassifiedRow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "booking_id")]
    BookingId,
    #[serde(rename = "raw_log_timestamp")]
    Timestamp,
    #[serde(rename = "booking_date")]
    BookingDate,
    #[serde(rename = "city")]
    City,
    #[serde(rename = "vehicle_type")]
    VehicleType,
    #[serde(rename = "service_type")]
    ServiceType,
    #[serde(rename = "master_service")]
    MasterService,
    #[serde(rename = "user_source")]
    Source,
    #[serde(rename = "crm_admin_name")]
    Person,
    #[serde(rename = "b2b_shop_name")]
    Outlet,
    #[serde(rename = "comments")]
    Comments,
    #[serde(rename = "cleaned_category")]
    Category,
    #[serde(rename = "activity_outcome")]
    ActivityOutcome,
    #[serde(rename = "conversion_status")]
    ConversionStatus,
    #[serde(rename = "booking_status_code")]
    BookingStatusCode,
    #[serde(rename = "flag")]
    Flag,
    #[serde(rename = "flag_unwntd")]
    UnwantedFlag,
    #[serde(rename = "axle_flag")]
    AxleFlag,
    #[serde(rename = "service_status_code")]
    ServiceStatus,
}

impl Field {
    /// Every field, in declaration order.
    pub const ALL: [Field; 19] = [
        Field::BookingId,
        Field::Timestamp,
        Field::BookingDate,
        Field::City,
        Field::VehicleType,
        Field::ServiceType,
        Field::MasterService,
        Field::Source,
        Field::Person,
        Field::Outlet,
        Field::Comments,
        Field::Category,
        Field::ActivityOutcome,
        Field::ConversionStatus,
        Field::BookingStatusCode,
        Field::Flag,
        Field::UnwantedFlag,
        Field::AxleFlag,
        Field::ServiceStatus,
    ];

    /// Machine id, as used in record exports and table column ids.
    pub fn id(self) -> &'static str {
        match self {
            Field::BookingId => "booking_id",
            Field::Timestamp => "raw_log_timestamp",
            Field::BookingDate => "booking_date",
            Field::City => "city",
            Field::VehicleType => "vehicle_type",
            Field::ServiceType => "service_type",
            Field::MasterService => "master_service",
            Field::Source => "user_source",
            Field::Person => "crm_admin_name",
            Field::Outlet => "b2b_shop_name",
            Field::Comments => "comments",
            Field::Category => "cleaned_category",
            Field::ActivityOutcome => "activity_outcome",
            Field::ConversionStatus => "conversion_status",
            Field::BookingStatusCode => "booking_status_code",
            Field::Flag => "flag",
            Field::UnwantedFlag => "flag_unwntd",
            Field::AxleFlag => "axle_flag",
            Field::ServiceStatus => "service_status_code",
        }
    }

    /// Column name used in detail (drill-down) tables and their exports.
    pub fn detail_label(self) -> &'static str {
        match self {
            Field::BookingId => "Booking ID",
            Field::Timestamp => "Booking Date",
            Field::BookingDate => "Date",
            Field::City => "City",
            Field::VehicleType => "Vehicle Type",
            Field::ServiceType => "Service Type",
            Field::MasterService => "Service",
            Field::Source => "Source",
            Field::Person => "Person",
            Field::Outlet => "Outlet Name",
            Field::Comments => "Comments",
            Field::Category => "Category",
            Field::ActivityOutcome => "Activity Status",
            Field::ConversionStatus => "Status",
            Field::BookingStatusCode => "Booking Status",
            Field::Flag => "Flag",
            Field::UnwantedFlag => "Unwanted Flag",
            Field::AxleFlag => "Axle Flag",
            Field::ServiceStatus => "Service Status",
        }
    }

    /// Column name used as a pivot index header.
    pub fn pivot_label(self) -> &'static str {
        match self {
            Field::MasterService => "Service",
            Field::VehicleType => "Type",
            Field::Person => "Name",
            Field::Source => "Source",
            Field::ActivityOutcome => "Activity status",
            Field::Category => "Category",
            other => other.detail_label(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Field {
    type Err = ConvdashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.id() == needle)
            .ok_or_else(|| ConvdashError::InvalidField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_ids_round_trip_through_from_str() {
        for field in Field::ALL {
            assert_eq!(Field::from_str(field.id()).unwrap(), field);
        }
        assert!(Field::from_str("mileage").is_err());
    }

    #[test]
    fn test_pivot_labels_fall_back_to_detail_labels() {
        assert_eq!(Field::MasterService.pivot_label(), "Service");
        assert_eq!(Field::Person.pivot_label(), "Name");
        assert_eq!(Field::Person.detail_label(), "Person");
        assert_eq!(Field::Comments.pivot_label(), "Comments");
        assert_eq!(Field::City.pivot_label(), "City");
    }

    #[test]
    fn test_field_serializes_as_id() {
        let json = serde_json::to_string(&Field::Source).unwrap();
        assert_eq!(json, "\"user_source\"");
    }
}
