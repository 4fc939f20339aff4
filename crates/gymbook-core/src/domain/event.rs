//! Domain Events - state changes other screens refresh on
//!
//! Application services emit these after the backend confirmed a change.
//! Each event travels on the bus under its [`DomainEvent::event_name`], with
//! the serialized event as data, so listeners can subscribe by name and
//! ignore the payload when they only need to reload.
//!
//! # Serialization
//!
//! Events serialize with a `type` field carrying the event name:
//! ```json
//! { "type": "competitionCreated", "competition_id": 4, "name": "June" }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::appointment::AppointmentId;
use super::competition::CompetitionId;

/// Event names used on the bus
pub mod names {
    pub const COMPETITION_CREATED: &str = "competitionCreated";
    pub const COMPETITION_MODIFIED: &str = "competitionModified";
    pub const APPOINTMENT_BOOKED: &str = "appointmentBooked";
    pub const APPOINTMENT_CANCELLED: &str = "appointmentCancelled";
    pub const WORKING_HOURS_CHANGED: &str = "workingHoursChanged";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomainEvent {
    /// A trainer created a competition
    CompetitionCreated {
        #[serde(skip_serializing_if = "Option::is_none")]
        competition_id: Option<CompetitionId>,
        name: String,
    },

    /// Membership or points of a competition changed
    ///
    /// Emitted on enroll/unenroll and after a workout is logged, since
    /// logged workouts earn points.
    CompetitionModified {
        #[serde(skip_serializing_if = "Option::is_none")]
        competition_id: Option<CompetitionId>,
    },

    /// An hour (optionally with machines) was booked
    AppointmentBooked {
        date: NaiveDate,
        hour: u8,
        machine_count: usize,
    },

    /// An appointment was cancelled
    AppointmentCancelled { appointment_id: AppointmentId },

    /// A trainer changed the bookable hours
    WorkingHoursChanged { start_hour: u8, end_hour: u8 },
}

impl DomainEvent {
    /// Name the event is published under
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::CompetitionCreated { .. } => names::COMPETITION_CREATED,
            Self::CompetitionModified { .. } => names::COMPETITION_MODIFIED,
            Self::AppointmentBooked { .. } => names::APPOINTMENT_BOOKED,
            Self::AppointmentCancelled { .. } => names::APPOINTMENT_CANCELLED,
            Self::WorkingHoursChanged { .. } => names::WORKING_HOURS_CHANGED,
        }
    }

    /// Whether screens showing appointment availability should reload
    pub fn affects_schedule(&self) -> bool {
        matches!(
            self,
            Self::AppointmentBooked { .. }
                | Self::AppointmentCancelled { .. }
                | Self::WorkingHoursChanged { .. }
        )
    }
}
