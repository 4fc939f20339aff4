//! Error types for the client core
//!
//! Domain rules fail with these typed errors. Service and repository layers
//! wrap them in `anyhow::Error`, so callers can `downcast_ref` when they need
//! to tell a validation problem apart from a backend failure.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::MachineId;

/// Reason reported when a booking session cannot be submitted
pub const SUBMIT_REJECTED_REASON: &str =
    "must select at least one machine and stay within the 60-minute limit";

/// Errors raised by booking sessions and appointment rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// The session is not in a submittable state
    #[error("validation error: {reason}")]
    Validation { reason: &'static str },

    /// The requested slot count is not one of the values offered for the machine
    #[error("{requested} slot(s) cannot be booked on machine {machine_id} (allowed: {allowed:?})")]
    SlotCountUnavailable {
        machine_id: MachineId,
        requested: u32,
        allowed: Vec<u32>,
    },

    /// The hour is not inside the working hours of the day
    #[error("hour {hour} is outside working hours")]
    HourOutsideWorkingHours { hour: u8 },

    /// The appointment has already started
    #[error("appointment starting at {starts_at} has already started and cannot be cancelled")]
    AppointmentInPast { starts_at: NaiveDateTime },
}

impl BookingError {
    pub(crate) fn rejected_submit() -> Self {
        Self::Validation {
            reason: SUBMIT_REJECTED_REASON,
        }
    }
}

/// Errors raised while validating schedule data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("hour {0} is outside 0..=23")]
    HourOutOfRange(i64),

    #[error("start hour {start} must be before end hour {end}")]
    EmptyRange { start: u8, end: u8 },
}

/// Errors raised by the event bus
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventBusError {
    #[error("event name must not be empty")]
    EmptyEventName,
}

/// Errors raised while validating a competition draft
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompetitionError {
    #[error("competition {0} is required")]
    MissingField(&'static str),
}

/// Errors raised while building the client configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid API url '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("invalid HTTP timeout '{0}' (expected whole seconds)")]
    InvalidTimeout(String),
}
