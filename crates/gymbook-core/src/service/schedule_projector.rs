//! Slot availability projector - turns the backend's availability listing
//! into the hour-by-machine grid the schedule and booking screens render.
//!
//! The backend only reports machines that have bookings in an hour. Every
//! other known machine is synthesised at its default capacity.

use std::collections::HashMap;
use std::ops::Range;
use tracing::debug;

use crate::domain::{
    merge_hourly, HourSlot, HourlyAvailability, Machine, MachineAvailability, MachineId,
    WorkingHours,
};

/// Project one day's availability over its working hours
///
/// Hours come out ascending, machines in the order of `machines`.
pub fn project_day(
    working_hours: &WorkingHours,
    machines: &[Machine],
    hourly: &[HourlyAvailability],
) -> Vec<HourSlot> {
    project_hours(working_hours.hours(), machines, hourly)
}

/// Project an arbitrary hour range
///
/// An empty or reversed range yields no rows.
pub fn project_hours(
    hours: Range<u8>,
    machines: &[Machine],
    hourly: &[HourlyAvailability],
) -> Vec<HourSlot> {
    let reported = index_reported(hourly);

    let slots: Vec<HourSlot> = hours
        .map(|hour| HourSlot {
            hour,
            slots: machines
                .iter()
                .map(|machine| match reported.get(&(hour, machine.id)) {
                    Some(&slot_count) => MachineAvailability::with_slots(machine, slot_count),
                    None => MachineAvailability::full_capacity(machine),
                })
                .collect(),
        })
        .collect();

    debug!(
        hours = slots.len(),
        machines = machines.len(),
        reported = reported.len(),
        "[ScheduleProjector] Projected schedule"
    );
    slots
}

/// Reported slot counts keyed by (hour, machine)
///
/// Duplicate entries are merged first, keeping the smallest count, so the
/// result does not depend on payload order.
fn index_reported(hourly: &[HourlyAvailability]) -> HashMap<(u8, MachineId), u32> {
    merge_hourly(hourly)
        .iter()
        .flat_map(|record| {
            record
                .machine_availabilities
                .iter()
                .map(move |machine| ((record.hour, machine.machine_id), machine.slot_count))
        })
        .collect()
}
