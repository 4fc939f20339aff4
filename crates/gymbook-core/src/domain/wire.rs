//! Serde helpers for backend date formats
//!
//! The backend is not consistent about dates: some endpoints send plain
//! dates, some send local date-times without offset, and bookings travel as
//! UTC instants. Everything is normalised at the boundary: naive values for
//! schedule data, UTC instants for competition periods.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

/// Parse a date from either `YYYY-MM-DD` or any ISO date-time starting with it
pub fn parse_date_prefix(value: &str) -> Option<NaiveDate> {
    let prefix = value.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Parse an ISO date-time with or without offset; offsets are converted to UTC
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_prefix(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{}'", raw)))
}

pub fn deserialize_date_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_time(&raw).ok_or_else(|| de::Error::custom(format!("invalid date-time '{}'", raw)))
}

/// Instant from an ISO date-time; values without offset are taken as UTC
pub fn deserialize_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_time(&raw)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| de::Error::custom(format!("invalid date-time '{}'", raw)))
}

/// `null` or a missing value becomes `T::default()`
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn serialize_date_time<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format("%Y-%m-%dT%H:%M:%S"))
}
