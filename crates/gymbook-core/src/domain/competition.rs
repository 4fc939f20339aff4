//! Competition entities
//!
//! Points are computed by the backend; the client only orders standings
//! and validates drafts before they are sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::appointment::UserId;
use super::wire;
use crate::error::CompetitionError;

/// Backend identifier of a competition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitionId(pub i64);

impl fmt::Display for CompetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitionType {
    Strength,
    Cardio,
    Mixed,
}

impl CompetitionType {
    /// Cardio competitions are scored on all cardio work, not on chosen machines
    pub fn uses_machine_list(&self) -> bool {
        !matches!(self, Self::Cardio)
    }
}

/// One row of a competition leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub competition_type: CompetitionType,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "wire::deserialize_utc")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "wire::deserialize_utc")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub machines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub users: Vec<Standing>,
}

impl Competition {
    /// Standings ordered by points, highest first; ties keep backend order
    pub fn leaderboard(&self) -> Vec<Standing> {
        let mut standings = self.users.clone();
        standings.sort_by(|a, b| b.points.cmp(&a.points));
        standings
    }

    /// 1-based position of a user on the leaderboard
    pub fn position_of(&self, user_id: UserId) -> Option<usize> {
        self.leaderboard()
            .iter()
            .position(|s| s.user_id == user_id)
            .map(|index| index + 1)
    }
}

/// Body of `POST /competitions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompetition {
    pub name: String,
    pub competition_type: CompetitionType,
    pub description: String,
    #[serde(deserialize_with = "wire::deserialize_utc")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "wire::deserialize_utc")]
    pub end_date: DateTime<Utc>,
    pub machines: Vec<String>,
}

/// Competition form contents before validation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompetitionDraft {
    pub name: String,
    pub competition_type: Option<CompetitionType>,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub machines: Vec<String>,
}

impl CompetitionDraft {
    /// Check required fields and normalise the machine list
    pub fn validate(self) -> Result<NewCompetition, CompetitionError> {
        if self.name.trim().is_empty() {
            return Err(CompetitionError::MissingField("name"));
        }
        let competition_type = self
            .competition_type
            .ok_or(CompetitionError::MissingField("type"))?;
        if self.description.trim().is_empty() {
            return Err(CompetitionError::MissingField("description"));
        }

        let machines = if competition_type.uses_machine_list() {
            self.machines
        } else {
            Vec::new()
        };

        Ok(NewCompetition {
            name: self.name,
            competition_type,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            machines,
        })
    }
}

/// Body of `POST /Competitions/enroll`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Enrollment {
    pub user_id: UserId,
    pub competition_code: String,
}
