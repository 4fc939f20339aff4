//! Application Services - Orchestration layer with event emission
//!
//! Application services sit between the screens and the backend
//! repositories. They:
//!
//! 1. **Orchestrate** backend calls and the client-side projections
//! 2. **Emit events** on the bus after the backend confirmed a change
//! 3. **Validate** inputs before anything is sent
//!
//! # Architecture
//!
//! ```text
//! Screens (calendar, booking, competitions, workout)
//!         │
//!         ▼
//! ┌─────────────────────────────────────┐
//! │      Application Services           │
//! │  ┌─────────────────────────────┐   │
//! │  │ AppointmentAppService       │   │
//! │  │ CompetitionAppService       │   │
//! │  │ WorkoutAppService           │   │
//! │  │ ProfileAppService           │   │
//! │  └─────────────┬───────────────┘   │
//! │                │                    │
//! │                ▼                    │
//! │         ┌──────────┐               │
//! │         │Event Bus │               │
//! │         └──────────┘               │
//! └─────────────────────────────────────┘
//!         │
//!         ▼
//! Backend (repository traits, GymApiClient)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let bus = EventBus::new();
//! let services = ApplicationServicesBuilder::new()
//!     .with_event_bus(bus.clone())
//!     .with_competition_repo(api.clone())
//!     .build()?;
//!
//! services.competition()?.create(draft).await?;
//! // -> Emits CompetitionCreated
//! ```

mod appointment;
mod booking_session;
mod competition;
mod profile;
mod workout;

pub use appointment::AppointmentAppService;
pub use booking_session::{
    BookingSession, PendingMachineBooking, ToggleOutcome, MAX_SLOTS_PER_MACHINE,
    SESSION_MINUTES_LIMIT,
};
pub use competition::CompetitionAppService;
pub use profile::ProfileAppService;
pub use workout::WorkoutAppService;

use anyhow::anyhow;
use std::sync::Arc;

use crate::domain::Machine;
use crate::event_bus::EventBus;
use crate::repository::*;

/// Builder for creating all application services with shared dependencies
#[derive(Default)]
pub struct ApplicationServicesBuilder {
    event_bus: Option<EventBus>,
    appointment_repo: Option<Arc<dyn AppointmentRepository>>,
    competition_repo: Option<Arc<dyn CompetitionRepository>>,
    workout_repo: Option<Arc<dyn WorkoutRepository>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    machines: Vec<Machine>,
}

impl ApplicationServicesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn with_appointment_repo(mut self, repo: Arc<dyn AppointmentRepository>) -> Self {
        self.appointment_repo = Some(repo);
        self
    }

    pub fn with_competition_repo(mut self, repo: Arc<dyn CompetitionRepository>) -> Self {
        self.competition_repo = Some(repo);
        self
    }

    pub fn with_workout_repo(mut self, repo: Arc<dyn WorkoutRepository>) -> Self {
        self.workout_repo = Some(repo);
        self
    }

    pub fn with_user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    /// Machines shown in schedules, in display order
    pub fn with_machines(mut self, machines: Vec<Machine>) -> Self {
        self.machines = machines;
        self
    }

    /// Build all application services
    ///
    /// The workout service needs both the appointment and the workout
    /// repository; it is left out when either is missing.
    pub fn build(self) -> anyhow::Result<ApplicationServices> {
        let event_bus = self.event_bus.ok_or_else(|| anyhow!("Event bus required"))?;
        let sender = event_bus.sender();

        let workout = match (&self.appointment_repo, self.workout_repo) {
            (Some(appointments), Some(workouts)) => Some(WorkoutAppService::new(
                appointments.clone(),
                workouts,
                sender.clone(),
            )),
            _ => None,
        };

        Ok(ApplicationServices {
            appointment: self
                .appointment_repo
                .map(|r| AppointmentAppService::new(r, self.machines, sender.clone())),
            competition: self
                .competition_repo
                .map(|r| CompetitionAppService::new(r, sender.clone())),
            workout,
            profile: self.user_repo.map(ProfileAppService::new),
            event_bus,
        })
    }
}

/// Container for all application services
pub struct ApplicationServices {
    /// Shared event bus
    pub event_bus: EventBus,
    /// Calendar, schedules and bookings
    pub appointment: Option<AppointmentAppService>,
    /// Competitions and membership
    pub competition: Option<CompetitionAppService>,
    /// Workouts and machine scans
    pub workout: Option<WorkoutAppService>,
    /// Member profiles
    pub profile: Option<ProfileAppService>,
}

impl ApplicationServices {
    /// Get appointment service
    pub fn appointment(&self) -> anyhow::Result<&AppointmentAppService> {
        self.appointment
            .as_ref()
            .ok_or_else(|| anyhow!("AppointmentAppService not configured"))
    }

    /// Get competition service
    pub fn competition(&self) -> anyhow::Result<&CompetitionAppService> {
        self.competition
            .as_ref()
            .ok_or_else(|| anyhow!("CompetitionAppService not configured"))
    }

    /// Get workout service
    pub fn workout(&self) -> anyhow::Result<&WorkoutAppService> {
        self.workout
            .as_ref()
            .ok_or_else(|| anyhow!("WorkoutAppService not configured"))
    }

    /// Get profile service
    pub fn profile(&self) -> anyhow::Result<&ProfileAppService> {
        self.profile
            .as_ref()
            .ok_or_else(|| anyhow!("ProfileAppService not configured"))
    }
}
