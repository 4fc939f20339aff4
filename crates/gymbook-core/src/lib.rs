//! # Gymbook Core Library
//!
//! Client core of the Gymbook mobile app: the event bus screens refresh on,
//! the slot availability grid, booking sessions, and access to the gym
//! backend.
//!
//! ## Modules
//!
//! - `domain` - Entities, backend payloads and domain events
//! - `event_bus` - In-process publish/subscribe between screens
//! - `service` - Schedule projections, machine access and the HTTP client
//! - `repository` - Backend access traits
//! - `application` - Booking sessions and application services with event emission
//! - `config` - Client configuration from the environment
//! - `logging` - Tracing subscriber setup
//! - `error` - Typed domain errors

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod event_bus;
pub mod logging;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use domain::*;
pub use repository::*;
pub use service::*;

pub use config::ClientConfig;
pub use error::{BookingError, CompetitionError, ConfigError, EventBusError, ScheduleError};

// Event-driven architecture exports
pub use event_bus::{EventBus, EventData, EventSender, ListenerResult, Subscription};
pub use application::{
    ApplicationServices, ApplicationServicesBuilder,
    AppointmentAppService, CompetitionAppService, ProfileAppService, WorkoutAppService,
    BookingSession, PendingMachineBooking, ToggleOutcome,
};
