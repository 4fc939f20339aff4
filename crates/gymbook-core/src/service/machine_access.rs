//! Machine access checks for scanned machine codes, and the workout window
//!
//! A user may use a machine during their booked hour if they reserved it,
//! or if the machine still has free slots in that hour.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{truncate_to_hour, Appointment, DayAvailability};

/// Warning threshold before the workout window closes
pub const FINAL_MINUTES: i64 = 5;

/// Outcome of scanning a machine code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MachineAccess {
    /// The machine can be used; `reserved` when the user booked it
    Granted { reserved: bool },
    /// Every slot of the machine is taken in this hour
    Unavailable,
    /// The machine does not appear in this hour's availability
    MachineNotFound,
    /// The backend reported nothing for the current hour
    NoHourAvailability,
    /// The backend reported nothing for today
    NoScheduleToday,
}

impl MachineAccess {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}

/// Decide whether the machine named `machine_name` may be used at `now`
///
/// Every entry listed for today is taken into account, merged the same way
/// the schedule grid merges them.
pub fn check_machine_access(
    days: &[DayAvailability],
    user_appointments: &[Appointment],
    now: NaiveDateTime,
    machine_name: &str,
) -> MachineAccess {
    let date = now.date();
    // hour() is always < 24
    let hour = now.hour() as u8;

    let Some(today) = DayAvailability::merged(days, date) else {
        return MachineAccess::NoScheduleToday;
    };
    let Some(current) = today.hour(hour) else {
        return MachineAccess::NoHourAvailability;
    };
    let Some(machine) = current.find_by_name(machine_name) else {
        return MachineAccess::MachineNotFound;
    };

    let reserved = user_appointments
        .iter()
        .any(|a| a.is_at(date, hour) && a.has_machine(machine_name));

    let access = if reserved || machine.slot_count > 0 {
        MachineAccess::Granted { reserved }
    } else {
        MachineAccess::Unavailable
    };
    debug!(
        machine = machine_name,
        hour,
        slots = machine.slot_count,
        reserved,
        ?access,
        "[MachineAccess] Checked machine"
    );
    access
}

/// Time window of a workout: the booked hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkoutWindow {
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

impl WorkoutWindow {
    /// Window of the hour containing `now`
    pub fn starting(now: NaiveDateTime) -> Self {
        let starts_at = truncate_to_hour(now);
        Self {
            starts_at,
            ends_at: starts_at + Duration::hours(1),
        }
    }

    /// Time left, zero once the window is over
    pub fn remaining(&self, now: NaiveDateTime) -> Duration {
        (self.ends_at - now).max(Duration::zero())
    }

    pub fn is_in_final_minutes(&self, now: NaiveDateTime) -> bool {
        !self.is_over(now) && self.remaining(now) <= Duration::minutes(FINAL_MINUTES)
    }

    pub fn is_over(&self, now: NaiveDateTime) -> bool {
        now >= self.ends_at
    }
}
