//! Appointment entities and booking request payloads

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::machine::{MachineId, MachineType};
use super::wire;

/// Backend identifier of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend identifier of an appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub i64);

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A machine reserved as part of an appointment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedMachine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<MachineId>,
    pub machine_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_count: Option<u32>,
}

/// A booked appointment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(
        deserialize_with = "wire::deserialize_date_time",
        serialize_with = "wire::serialize_date_time"
    )]
    pub date: NaiveDateTime,
    #[serde(default)]
    pub machines: Vec<ReservedMachine>,
}

impl Appointment {
    pub fn new(id: i64, starts_at: NaiveDateTime) -> Self {
        Self {
            id: AppointmentId(id),
            user_id: None,
            date: starts_at,
            machines: Vec::new(),
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_machine(mut self, machine_name: impl Into<String>) -> Self {
        self.machines.push(ReservedMachine {
            machine_id: None,
            machine_name: machine_name.into(),
            slot_count: None,
        });
        self
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    pub fn hour(&self) -> u8 {
        // hour() is always < 24
        self.date.hour() as u8
    }

    /// Whether the appointment starts at `hour` on `date`
    pub fn is_at(&self, date: NaiveDate, hour: u8) -> bool {
        self.day() == date && self.hour() == hour
    }

    /// Appointments can be cancelled until they start
    pub fn can_cancel(&self, now: NaiveDateTime) -> bool {
        now <= self.date
    }

    pub fn has_machine(&self, machine_name: &str) -> bool {
        self.machines.iter().any(|m| m.machine_name == machine_name)
    }
}

/// A user with all their appointments (trainer view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAppointments {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl UserAppointments {
    pub fn has_appointment_on(&self, date: NaiveDate) -> bool {
        self.appointments.iter().any(|a| a.day() == date)
    }
}

/// One machine line of a booking request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MachineBookingLine {
    pub machine_id: MachineId,
    pub machine_name: String,
    #[serde(rename = "Type")]
    pub machine_type: MachineType,
    pub slot_count: u32,
}

/// Validated output of a booking session: one hour, one or more machines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub hour: u8,
    pub machines: Vec<MachineBookingLine>,
}

impl BookingRequest {
    pub fn total_minutes(&self) -> u32 {
        self.machines
            .iter()
            .map(|line| line.slot_count * line.machine_type.minutes_per_slot())
            .sum()
    }
}

/// Body of `POST /Appointments/book`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppointmentRequest {
    pub user_id: UserId,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub machines: Vec<MachineBookingLine>,
}

impl AppointmentRequest {
    /// Book a plain hour on `date`
    ///
    /// The instant sent is the start of the hour in UTC.
    pub fn hour(user_id: UserId, date: NaiveDate, hour: u8) -> Self {
        Self {
            user_id,
            date: start_of_hour_utc(date, hour),
            machines: Vec::new(),
        }
    }

    /// Book the machines of a submitted session on `date`
    pub fn machines(user_id: UserId, date: NaiveDate, booking: BookingRequest) -> Self {
        Self {
            user_id,
            date: start_of_hour_utc(date, booking.hour),
            machines: booking.machines,
        }
    }
}

/// Body of `POST /Appointments/checkAppointment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppointmentCheck {
    pub user_id: UserId,
    #[serde(serialize_with = "wire::serialize_date_time")]
    pub date: NaiveDateTime,
}

/// Start of `hour` on `date`, as a UTC instant
pub fn start_of_hour_utc(date: NaiveDate, hour: u8) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(u32::from(hour), 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&date.and_time(time))
}

/// `now` truncated to the start of its hour
pub fn truncate_to_hour(now: NaiveDateTime) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(now.hour(), 0, 0).unwrap_or_default();
    now.date().and_time(time)
}
