//! Booking Session - multi-machine selection for one hour
//!
//! A session starts from one projected [`HourSlot`] and collects the
//! machines the user wants, each with a slot count. The combined time may
//! not exceed [`SESSION_MINUTES_LIMIT`]. Nothing is sent anywhere: `submit`
//! hands the validated request to a callback and resets the session.

use tracing::debug;

use crate::domain::{BookingRequest, HourSlot, MachineAvailability, MachineBookingLine, MachineId};
use crate::error::BookingError;

/// Maximum minutes of machine time in one session
pub const SESSION_MINUTES_LIMIT: u32 = 60;

/// Most slots that can be booked on a single machine
pub const MAX_SLOTS_PER_MACHINE: u32 = 2;

/// A machine selected in the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMachineBooking {
    pub machine_id: MachineId,
    pub slot_count: u32,
}

/// Result of [`BookingSession::toggle_machine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// Not added: no slots left, or one slot would exceed the time limit
    Unavailable,
    /// The machine is not part of this hour
    UnknownMachine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSession {
    hour: HourSlot,
    selected: Vec<PendingMachineBooking>,
}

impl BookingSession {
    pub fn new(hour: HourSlot) -> Self {
        Self {
            hour,
            selected: Vec::new(),
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour.hour
    }

    /// Availability of every machine in the hour
    pub fn slots(&self) -> &[MachineAvailability] {
        &self.hour.slots
    }

    /// Selected machines, in selection order
    pub fn selected(&self) -> &[PendingMachineBooking] {
        &self.selected
    }

    pub fn is_selected(&self, machine_id: MachineId) -> bool {
        self.pending(machine_id).is_some()
    }

    /// Minutes used by the current selection
    pub fn total_minutes(&self) -> u32 {
        self.minutes_used_except(None)
    }

    /// Minutes still available, zero if the limit is reached
    pub fn remaining_minutes(&self) -> u32 {
        SESSION_MINUTES_LIMIT.saturating_sub(self.total_minutes())
    }

    /// Whether the machine could be selected right now
    ///
    /// Selected machines are always toggleable, so this is true for them too.
    pub fn is_selectable(&self, machine_id: MachineId) -> bool {
        if self.is_selected(machine_id) {
            return true;
        }
        match self.hour.find(machine_id) {
            Some(machine) => {
                machine.slot_count > 0
                    && machine.machine_type.minutes_per_slot() <= self.remaining_minutes()
            }
            None => false,
        }
    }

    /// Select a machine with one slot, or deselect it
    pub fn toggle_machine(&mut self, machine_id: MachineId) -> ToggleOutcome {
        if let Some(index) = self.selected.iter().position(|p| p.machine_id == machine_id) {
            self.selected.remove(index);
            debug!(machine_id = %machine_id, hour = self.hour.hour, "[BookingSession] Deselected machine");
            return ToggleOutcome::Deselected;
        }

        if self.hour.find(machine_id).is_none() {
            debug!(machine_id = %machine_id, hour = self.hour.hour, "[BookingSession] Ignoring unknown machine");
            return ToggleOutcome::UnknownMachine;
        }
        if !self.is_selectable(machine_id) {
            debug!(
                machine_id = %machine_id,
                remaining_minutes = self.remaining_minutes(),
                "[BookingSession] Machine cannot be added"
            );
            return ToggleOutcome::Unavailable;
        }

        self.selected.push(PendingMachineBooking {
            machine_id,
            slot_count: 1,
        });
        debug!(machine_id = %machine_id, hour = self.hour.hour, "[BookingSession] Selected machine");
        ToggleOutcome::Selected
    }

    /// Slot counts the picker may offer for a machine
    ///
    /// Bounded by [`MAX_SLOTS_PER_MACHINE`], the slots left in the hour and
    /// the minutes the other selected machines leave over.
    pub fn slot_count_options(&self, machine_id: MachineId) -> Vec<u32> {
        let Some(machine) = self.hour.find(machine_id) else {
            return Vec::new();
        };
        let budget = SESSION_MINUTES_LIMIT.saturating_sub(self.minutes_used_except(Some(machine_id)));
        let minutes_per_slot = machine.machine_type.minutes_per_slot();

        (1..=MAX_SLOTS_PER_MACHINE)
            .filter(|count| *count <= machine.slot_count && count * minutes_per_slot <= budget)
            .collect()
    }

    /// Change the slot count of a selected machine
    ///
    /// Machines that are unknown or not selected are ignored.
    pub fn set_slot_count(&mut self, machine_id: MachineId, count: u32) -> Result<(), BookingError> {
        if !self.is_selected(machine_id) {
            debug!(machine_id = %machine_id, "[BookingSession] Ignoring slot count for unselected machine");
            return Ok(());
        }

        let allowed = self.slot_count_options(machine_id);
        if !allowed.contains(&count) {
            return Err(BookingError::SlotCountUnavailable {
                machine_id,
                requested: count,
                allowed,
            });
        }

        if let Some(pending) = self.selected.iter_mut().find(|p| p.machine_id == machine_id) {
            pending.slot_count = count;
        }
        Ok(())
    }

    pub fn is_submittable(&self) -> bool {
        !self.selected.is_empty() && self.total_minutes() <= SESSION_MINUTES_LIMIT
    }

    /// Hand the selection to `on_book` and reset the session
    ///
    /// On a rejected submit the session is left untouched and `on_book` is
    /// not called.
    pub fn submit<F, R>(&mut self, on_book: F) -> Result<R, BookingError>
    where
        F: FnOnce(BookingRequest) -> R,
    {
        if !self.is_submittable() {
            return Err(BookingError::rejected_submit());
        }

        let request = self.request();
        debug!(
            hour = request.hour,
            machines = request.machines.len(),
            minutes = request.total_minutes(),
            "[BookingSession] Submitting"
        );
        let result = on_book(request);
        self.clear();
        Ok(result)
    }

    /// Drop the selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    fn request(&self) -> BookingRequest {
        BookingRequest {
            hour: self.hour.hour,
            machines: self
                .selected
                .iter()
                .filter_map(|pending| {
                    self.hour.find(pending.machine_id).map(|m| MachineBookingLine {
                        machine_id: m.machine_id,
                        machine_name: m.machine_name.clone(),
                        machine_type: m.machine_type,
                        slot_count: pending.slot_count,
                    })
                })
                .collect(),
        }
    }

    fn pending(&self, machine_id: MachineId) -> Option<&PendingMachineBooking> {
        self.selected.iter().find(|p| p.machine_id == machine_id)
    }

    fn minutes_used_except(&self, excluded: Option<MachineId>) -> u32 {
        self.selected
            .iter()
            .filter(|p| Some(p.machine_id) != excluded)
            .filter_map(|p| {
                self.hour
                    .find(p.machine_id)
                    .map(|m| p.slot_count * m.machine_type.minutes_per_slot())
            })
            .sum()
    }
}
