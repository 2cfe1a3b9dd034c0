//! The dashboard's fixed pivot catalogue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::classify::FOLLOW_UP_CODES;
use crate::data::{ActivityOutcome, Field};
use crate::error::ConvdashError;

use super::options::PivotSpec;
use super::predicate::Condition;

/// Columns every drill-down detail table starts with (after the serial number).
pub const BASE_DETAIL_COLUMNS: [Field; 2] = [Field::BookingId, Field::Timestamp];

/// A named pivot of the conversion dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PivotView {
    /// Conversion status by master service
    Service,
    /// Conversion status by assigned person
    Person,
    /// Conversion status by booking source
    Source,
    /// Cancelled bookings by comment and vehicle class
    Cancelled,
    /// Declined bookings by comment and vehicle class
    Other,
    /// Open follow-ups by category and vehicle class
    #[serde(rename = "followup")]
    FollowUp,
}

impl PivotView {
    pub const ALL: [PivotView; 6] = [
        PivotView::Service,
        PivotView::Person,
        PivotView::Source,
        PivotView::Cancelled,
        PivotView::Other,
        PivotView::FollowUp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PivotView::Service => "service",
            PivotView::Person => "person",
            PivotView::Source => "source",
            PivotView::Cancelled => "cancelled",
            PivotView::Other => "other",
            PivotView::FollowUp => "followup",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PivotView::Service => "Service-Based Conversion",
            PivotView::Person => "Person-Based Conversion",
            PivotView::Source => "Source-Based Conversion",
            PivotView::Cancelled => "Non Conversion - Cancelled",
            PivotView::Other => "Non Conversion - Other Booking",
            PivotView::FollowUp => "Follow-up Bookings",
        }
    }

    pub fn spec(self) -> PivotSpec {
        match self {
            PivotView::Service => PivotSpec::new(vec![Field::MasterService], Field::ConversionStatus),
            PivotView::Person => PivotSpec::new(vec![Field::Person], Field::ConversionStatus),
            PivotView::Source => PivotSpec::new(vec![Field::Source], Field::ConversionStatus),
            PivotView::Cancelled => outcome_spec(ActivityOutcome::CancelledBooking, "cancelled"),
            PivotView::Other => outcome_spec(ActivityOutcome::OtherBooking, "other"),
            PivotView::FollowUp => PivotSpec::new(vec![Field::Category], Field::VehicleType)
                .filter(Condition::is_in(
                    Field::BookingStatusCode,
                    FOLLOW_UP_CODES.iter().map(|c| c.to_string()),
                ))
                .filter(Condition::eq(Field::Flag, "0"))
                .suffix("followup"),
        }
    }

    /// Columns of the drill-down detail table for this view.
    pub fn detail_columns(self) -> Vec<Field> {
        let specific: &[Field] = match self {
            PivotView::Service => &[
                Field::MasterService,
                Field::VehicleType,
                Field::Outlet,
                Field::Person,
            ],
            PivotView::Person => &[
                Field::Person,
                Field::MasterService,
                Field::VehicleType,
                Field::Source,
                Field::Outlet,
            ],
            PivotView::Source => &[
                Field::Source,
                Field::MasterService,
                Field::VehicleType,
                Field::Person,
                Field::Outlet,
            ],
            PivotView::Cancelled | PivotView::Other => &[
                Field::ActivityOutcome,
                Field::Comments,
                Field::VehicleType,
                Field::MasterService,
                Field::Outlet,
            ],
            PivotView::FollowUp => &[
                Field::Category,
                Field::VehicleType,
                Field::MasterService,
                Field::Person,
            ],
        };
        BASE_DETAIL_COLUMNS
            .iter()
            .chain(specific)
            .copied()
            .collect()
    }

    /// File name for the pivot's CSV export.
    pub fn export_file_name(self) -> &'static str {
        match self {
            PivotView::Service => "service_conversion_data.csv",
            PivotView::Person => "person_conversion_data.csv",
            PivotView::Source => "source_conversion_data.csv",
            PivotView::Cancelled => "non_conversion_cancelled_data.csv",
            PivotView::Other => "non_conversion_other_data.csv",
            PivotView::FollowUp => "followup_data.csv",
        }
    }
}

fn outcome_spec(outcome: ActivityOutcome, suffix: &str) -> PivotSpec {
    PivotSpec::new(
        vec![Field::ActivityOutcome, Field::Comments],
        Field::VehicleType,
    )
    .filter(Condition::eq(Field::ActivityOutcome, outcome.label()))
    .suffix(suffix)
}

impl fmt::Display for PivotView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PivotView {
    type Err = ConvdashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "service" => Ok(PivotView::Service),
            "person" | "name" => Ok(PivotView::Person),
            "source" => Ok(PivotView::Source),
            "cancelled" => Ok(PivotView::Cancelled),
            "other" => Ok(PivotView::Other),
            "followup" | "follow-up" => Ok(PivotView::FollowUp),
            _ => Err(ConvdashError::InvalidView(s.to_string())),
        }
    }
}
