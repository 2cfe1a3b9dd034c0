//! Raw booking records as delivered by a record source.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Offset applied to the stored UTC log time to get the local booking date (+05:30).
pub const LOCAL_OFFSET_MINUTES: i64 = 330;

/// Timestamp layouts accepted in record exports.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// One booking/service event, unclassified.
///
/// Numeric flags are optional because upstream exports leave them blank;
/// a missing or malformed number reads as 0 everywhere downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub booking_id: i64,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub raw_log_timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub vehicle_type: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub master_service: String,
    #[serde(default)]
    pub user_source: String,
    #[serde(default)]
    pub crm_admin_name: String,
    #[serde(default)]
    pub b2b_shop_name: String,
    #[serde(default, deserialize_with = "deserialize_code")]
    pub booking_status_code: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_code")]
    pub flag: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_code")]
    pub flag_unwntd: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_code")]
    pub axle_flag: Option<i64>,
    #[serde(default)]
    pub service_status_code: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub category: String,
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// A status code or flag cell as it appears in exports.
#[derive(Deserialize)]
#[serde(untagged)]
enum CodeCell {
    Int(i64),
    Float(f64),
    Text(String),
}

impl CodeCell {
    fn into_code(self) -> Option<i64> {
        match self {
            CodeCell::Int(code) => Some(code),
            CodeCell::Float(value) => integral(value),
            CodeCell::Text(text) => parse_code(&text),
        }
    }
}

fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

/// Read a code cell. Integral floats such as `1.0` count as integers;
/// anything else unparsable is missing.
pub fn parse_code(value: &str) -> Option<i64> {
    let value = value.trim();
    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().and_then(integral))
}

fn deserialize_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CodeCell>::deserialize(deserializer)
        .ok()
        .flatten()
        .and_then(CodeCell::into_code))
}

/// Parse a log timestamp in any of the accepted export layouts.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

impl RawRecord {
    /// Create an otherwise empty record with the given booking id.
    pub fn new(booking_id: i64) -> Self {
        Self {
            booking_id,
            ..Self::default()
        }
    }

    /// Local calendar date of the booking, if the record carries a timestamp.
    pub fn booking_date(&self) -> Option<NaiveDate> {
        self.raw_log_timestamp
            .map(|ts| (ts + Duration::minutes(LOCAL_OFFSET_MINUTES)).date())
    }

    /// Builder: set the log timestamp (UTC).
    pub fn with_timestamp(mut self, ts: NaiveDateTime) -> Self {
        self.raw_log_timestamp = Some(ts);
        self
    }

    /// Builder: set the city.
    pub fn with_city(mut self, city: &str) -> Self {
        self.city = city.to_string();
        self
    }

    /// Builder: set the free-text vehicle type.
    pub fn with_vehicle_type(mut self, vehicle_type: &str) -> Self {
        self.vehicle_type = vehicle_type.to_string();
        self
    }

    /// Builder: set the service type.
    pub fn with_service_type(mut self, service_type: &str) -> Self {
        self.service_type = service_type.to_string();
        self
    }

    /// Builder: set the master service.
    pub fn with_master_service(mut self, master_service: &str) -> Self {
        self.master_service = master_service.to_string();
        self
    }

    /// Builder: set the booking source.
    pub fn with_source(mut self, source: &str) -> Self {
        self.user_source = source.to_string();
        self
    }

    /// Builder: set the assigned person.
    pub fn with_person(mut self, person: &str) -> Self {
        self.crm_admin_name = person.to_string();
        self
    }

    /// Builder: set the outlet name.
    pub fn with_outlet(mut self, outlet: &str) -> Self {
        self.b2b_shop_name = outlet.to_string();
        self
    }

    /// Builder: set the booking status code.
    pub fn with_booking_status(mut self, code: i64) -> Self {
        self.booking_status_code = Some(code);
        self
    }

    /// Builder: set the cancellation flag.
    pub fn with_flag(mut self, flag: i64) -> Self {
        self.flag = Some(flag);
        self
    }

    /// Builder: set the unwanted/duplicate flag.
    pub fn with_unwanted_flag(mut self, flag: i64) -> Self {
        self.flag_unwntd = Some(flag);
        self
    }

    /// Builder: set the axle (hand-off) flag.
    pub fn with_axle_flag(mut self, flag: i64) -> Self {
        self.axle_flag = Some(flag);
        self
    }

    /// Builder: set the service status text.
    pub fn with_service_status(mut self, status: &str) -> Self {
        self.service_status_code = status.to_string();
        self
    }

    /// Builder: set the operator comment.
    pub fn with_comments(mut self, comments: &str) -> Self {
        self.comments = comments.to_string();
        self
    }

    /// Builder: set the free-text category.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }
}
