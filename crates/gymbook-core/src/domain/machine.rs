//! Machine entity - a piece of gym equipment that can be booked by the slot

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier of a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(pub i64);

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Machine category
///
/// The category decides both how many users can share the machine within
/// one hour and how long a single slot lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineType {
    #[serde(alias = "strength")]
    Strength,
    #[serde(alias = "cardio")]
    Cardio,
}

impl MachineType {
    /// Slots per hour when the backend reports nothing for a machine.
    ///
    /// The backend omits machines that are fully available, so this is the
    /// value the projector falls back to.
    pub const fn default_capacity(self) -> u32 {
        match self {
            Self::Strength => 4,
            Self::Cardio => 2,
        }
    }

    /// Duration of one slot in minutes
    pub const fn minutes_per_slot(self) -> u32 {
        match self {
            Self::Strength => 15,
            Self::Cardio => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Cardio => "Cardio",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A machine known to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
}

impl Machine {
    pub fn new(id: i64, name: impl Into<String>, machine_type: MachineType) -> Self {
        Self {
            id: MachineId(id),
            name: name.into(),
            machine_type,
        }
    }

    /// Create a strength machine
    pub fn strength(id: i64, name: impl Into<String>) -> Self {
        Self::new(id, name, MachineType::Strength)
    }

    /// Create a cardio machine
    pub fn cardio(id: i64, name: impl Into<String>) -> Self {
        Self::new(id, name, MachineType::Cardio)
    }
}
