//! Schedule value objects: working hours, availability payloads and the
//! projected per-hour slot grid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::Range;

use super::machine::{Machine, MachineId, MachineType};
use super::wire;
use crate::error::ScheduleError;

/// Last valid hour of a day
pub const LAST_HOUR: u8 = 23;

/// Spots per hour assumed when the backend omits an hour from the day overview
pub const DEFAULT_SPOTS_PER_HOUR: u32 = 7;

fn checked_hour(value: i64) -> Result<u8, ScheduleError> {
    u8::try_from(value)
        .ok()
        .filter(|hour| *hour <= LAST_HOUR)
        .ok_or(ScheduleError::HourOutOfRange(value))
}

// ============================================================================
// WORKING HOURS
// ============================================================================

/// Bookable hours of a day, as the half-open range `[start_hour, end_hour)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawWorkingHours")]
pub struct WorkingHours {
    start_hour: u8,
    end_hour: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorkingHours {
    start_hour: i64,
    end_hour: i64,
}

impl TryFrom<RawWorkingHours> for WorkingHours {
    type Error = ScheduleError;

    fn try_from(raw: RawWorkingHours) -> Result<Self, Self::Error> {
        Self::new(raw.start_hour, raw.end_hour)
    }
}

impl WorkingHours {
    /// Validate and build working hours
    ///
    /// Both hours must lie in `0..=23` and `start < end`.
    pub fn new(start_hour: i64, end_hour: i64) -> Result<Self, ScheduleError> {
        let start = checked_hour(start_hour)?;
        let end = checked_hour(end_hour)?;
        if start >= end {
            return Err(ScheduleError::EmptyRange { start, end });
        }
        Ok(Self {
            start_hour: start,
            end_hour: end,
        })
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u8 {
        self.end_hour
    }

    /// Hours covered, `end_hour` excluded
    pub fn hours(&self) -> Range<u8> {
        self.start_hour..self.end_hour
    }

    pub fn contains(&self, hour: u8) -> bool {
        self.hours().contains(&hour)
    }
}

impl Default for WorkingHours {
    /// Whole day as far as the 0..=23 bounds allow
    fn default() -> Self {
        Self {
            start_hour: 0,
            end_hour: LAST_HOUR,
        }
    }
}

// ============================================================================
// BACKEND AVAILABILITY PAYLOAD
// ============================================================================

/// Remaining slots reported by the backend for one machine in one hour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedMachineSlots {
    pub machine_id: MachineId,
    #[serde(default)]
    pub machine_name: String,
    pub slot_count: u32,
}

impl ReportedMachineSlots {
    /// Fold a second report of the same machine; the smaller count wins
    pub fn merge(&mut self, other: &ReportedMachineSlots) {
        self.slot_count = self.slot_count.min(other.slot_count);
        if self.machine_name.is_empty() {
            self.machine_name = other.machine_name.clone();
        }
    }
}

/// Availability of one hour as reported by the backend
///
/// Machines missing from `machine_availabilities` are fully available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyAvailability {
    pub hour: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spots_left: Option<u32>,
    #[serde(default)]
    pub is_full: bool,
    #[serde(default)]
    pub machine_availabilities: Vec<ReportedMachineSlots>,
}

impl HourlyAvailability {
    pub fn new(hour: u8) -> Self {
        Self {
            hour,
            spots_left: None,
            is_full: false,
            machine_availabilities: Vec::new(),
        }
    }

    pub fn with_machine(mut self, machine_id: i64, name: impl Into<String>, slot_count: u32) -> Self {
        self.machine_availabilities.push(ReportedMachineSlots {
            machine_id: MachineId(machine_id),
            machine_name: name.into(),
            slot_count,
        });
        self
    }

    pub fn with_spots(mut self, spots_left: u32, is_full: bool) -> Self {
        self.spots_left = Some(spots_left);
        self.is_full = is_full;
        self
    }

    pub fn find_by_name(&self, machine_name: &str) -> Option<&ReportedMachineSlots> {
        self.machine_availabilities
            .iter()
            .find(|m| m.machine_name == machine_name)
    }

    /// Fold another report of the same hour into this one
    ///
    /// Spots left and machine slot counts keep the smaller value, and the
    /// hour is full if either report says so.
    pub fn merge(&mut self, other: &HourlyAvailability) {
        self.spots_left = match (self.spots_left, other.spots_left) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.is_full |= other.is_full;
        for machine in &other.machine_availabilities {
            match self
                .machine_availabilities
                .iter_mut()
                .find(|m| m.machine_id == machine.machine_id)
            {
                Some(existing) => existing.merge(machine),
                None => self.machine_availabilities.push(machine.clone()),
            }
        }
    }
}

/// One record per hour, ascending, with duplicate reports merged
pub fn merge_hourly<'a>(
    records: impl IntoIterator<Item = &'a HourlyAvailability>,
) -> Vec<HourlyAvailability> {
    let mut by_hour: BTreeMap<u8, HourlyAvailability> = BTreeMap::new();
    for record in records {
        match by_hour.entry(record.hour) {
            Entry::Occupied(mut merged) => merged.get_mut().merge(record),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
        }
    }
    by_hour.into_values().collect()
}

/// One entry of the backend's availability listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    #[serde(deserialize_with = "wire::deserialize_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub is_full: bool,
    #[serde(default)]
    pub hourly_availability: Vec<HourlyAvailability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<WorkingHours>,
}

impl DayAvailability {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            is_full: false,
            hourly_availability: Vec::new(),
            working_hours: None,
        }
    }

    pub fn with_hour(mut self, hour: HourlyAvailability) -> Self {
        self.hourly_availability.push(hour);
        self
    }

    pub fn with_working_hours(mut self, hours: WorkingHours) -> Self {
        self.working_hours = Some(hours);
        self
    }

    pub fn full(mut self) -> Self {
        self.is_full = true;
        self
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for record in &self.hourly_availability {
            checked_hour(i64::from(record.hour))?;
        }
        Ok(())
    }

    pub fn hour(&self, hour: u8) -> Option<&HourlyAvailability> {
        self.hourly_availability.iter().find(|h| h.hour == hour)
    }

    /// Every entry listed for `date`, folded into one
    ///
    /// The backend may list a date more than once. The merged day is full if
    /// any entry is, working hours come from the first entry that has them,
    /// and hourly records are merged with [`merge_hourly`].
    pub fn merged(days: &[DayAvailability], date: NaiveDate) -> Option<DayAvailability> {
        let entries: Vec<&DayAvailability> = days.iter().filter(|d| d.date == date).collect();
        if entries.is_empty() {
            return None;
        }
        Some(DayAvailability {
            date,
            is_full: entries.iter().any(|d| d.is_full),
            hourly_availability: merge_hourly(
                entries.iter().flat_map(|d| d.hourly_availability.iter()),
            ),
            working_hours: entries.iter().find_map(|d| d.working_hours),
        })
    }
}

// ============================================================================
// PROJECTED GRID
// ============================================================================

/// Remaining capacity of one machine within one hour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineAvailability {
    pub machine_id: MachineId,
    pub machine_name: String,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    pub slot_count: u32,
}

impl MachineAvailability {
    /// Availability of a machine nobody has booked yet
    pub fn full_capacity(machine: &Machine) -> Self {
        Self::with_slots(machine, machine.machine_type.default_capacity())
    }

    pub fn with_slots(machine: &Machine, slot_count: u32) -> Self {
        Self {
            machine_id: machine.id,
            machine_name: machine.name.clone(),
            machine_type: machine.machine_type,
            slot_count,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.machine_type.default_capacity()
    }

    pub fn is_exhausted(&self) -> bool {
        self.slot_count == 0
    }

    /// Table label such as `3/4`
    pub fn ratio_label(&self) -> String {
        format!("{}/{}", self.slot_count, self.capacity())
    }
}

/// One row of a day's schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourSlot {
    pub hour: u8,
    pub slots: Vec<MachineAvailability>,
}

impl HourSlot {
    pub fn find(&self, machine_id: MachineId) -> Option<&MachineAvailability> {
        self.slots.iter().find(|s| s.machine_id == machine_id)
    }

    /// Row label such as `9:00`
    pub fn label(&self) -> String {
        format!("{}:00", self.hour)
    }
}
