//! Domain entities, value objects, and events
//!
//! This module contains all domain-level types for Gymbook:
//! - Entities (Machine, Appointment, Competition, UserProfile)
//! - Value Objects (WorkingHours, MachineAvailability, HourSlot)
//! - Backend payloads, validated where serde alone cannot
//! - Domain Events (DomainEvent enum published on the event bus)

mod appointment;
mod competition;
mod event;
mod machine;
mod schedule;
mod user;
mod workout;
pub mod wire;

pub use event::{names as event_names, DomainEvent};

pub use appointment::*;
pub use competition::*;
pub use machine::*;
pub use schedule::*;
pub use user::*;
pub use workout::*;
