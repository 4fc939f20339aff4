//! Day overview and calendar markings
//!
//! Derived views over the appointment listing: how many spots each hour of a
//! day has left, which hours the user already booked, and which calendar
//! days are full.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

use crate::domain::{
    merge_hourly, Appointment, AppointmentId, DayAvailability, HourlyAvailability,
    UserAppointments, DEFAULT_SPOTS_PER_HOUR,
};

/// One row of the hour picker for a single day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourOverview {
    pub hour: u8,
    pub spots_left: u32,
    pub is_full: bool,
    /// The user's own appointment in this hour, if any
    pub user_appointment: Option<AppointmentId>,
}

impl HourOverview {
    pub fn is_booked_by_user(&self) -> bool {
        self.user_appointment.is_some()
    }

    /// A new booking is possible when the hour is open and the user has none
    pub fn is_bookable(&self) -> bool {
        !self.is_full && self.user_appointment.is_none()
    }
}

/// Build the hour picker rows for `date`
///
/// Hours the backend did not report default to
/// [`DEFAULT_SPOTS_PER_HOUR`] spots and not full. An hour reported twice
/// keeps the fewer spots and is full if either report says so.
pub fn project_day_overview(
    hours: Range<u8>,
    hourly: &[HourlyAvailability],
    user_appointments: &[Appointment],
    date: NaiveDate,
) -> Vec<HourOverview> {
    let merged = merge_hourly(hourly);
    hours
        .map(|hour| {
            let record = merged.iter().find(|h| h.hour == hour);
            HourOverview {
                hour,
                spots_left: record
                    .and_then(|r| r.spots_left)
                    .unwrap_or(DEFAULT_SPOTS_PER_HOUR),
                is_full: record.is_some_and(|r| r.is_full),
                user_appointment: user_appointments
                    .iter()
                    .find(|a| a.is_at(date, hour))
                    .map(|a| a.id),
            }
        })
        .collect()
}

/// Calendar marking of a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayMarking {
    Full,
    Open,
}

/// Mark every listed date as full or open
///
/// A date reported more than once is full if any record says so.
pub fn mark_calendar(days: &[DayAvailability]) -> BTreeMap<NaiveDate, DayMarking> {
    let mut markings = BTreeMap::new();
    for day in days {
        let marking = if day.is_full {
            DayMarking::Full
        } else {
            DayMarking::Open
        };
        markings
            .entry(day.date)
            .and_modify(|existing| {
                if marking == DayMarking::Full {
                    *existing = DayMarking::Full;
                }
            })
            .or_insert(marking);
    }
    markings
}

/// Users with at least one appointment on `date`
pub fn filter_users_by_date(users: &[UserAppointments], date: NaiveDate) -> Vec<UserAppointments> {
    users
        .iter()
        .filter(|u| u.has_appointment_on(date))
        .cloned()
        .collect()
}
