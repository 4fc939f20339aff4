//! Workout payloads
//!
//! Exercise data is generated by the backend from the time spent on a
//! machine. The client collects the records of one workout and flattens them
//! into detail rows when the workout is logged.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::appointment::UserId;
use super::machine::MachineType;
use super::wire;

/// Body of `POST /Workouts/Generate{Strength,Cardio}ExerciseData`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSample {
    pub exercise_name: String,
    /// Seconds spent on the machine
    pub duration: u64,
    #[serde(skip)]
    pub machine_type: MachineType,
}

/// Exercise data generated by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExerciseRecord {
    Strength {
        exercise: String,
        #[serde(rename = "repsPerSet", default)]
        reps_per_set: Vec<u32>,
        #[serde(rename = "weightPerSet", default)]
        weight_per_set: Vec<f64>,
    },
    Cardio {
        exercise: String,
        #[serde(default)]
        distance: f64,
        #[serde(default)]
        avg_speed: f64,
        #[serde(default)]
        max_speed: f64,
        #[serde(default)]
        calories: f64,
        #[serde(default)]
        time: f64,
    },
}

impl ExerciseRecord {
    pub fn exercise(&self) -> &str {
        match self {
            Self::Strength { exercise, .. } | Self::Cardio { exercise, .. } => exercise,
        }
    }

    /// Detail rows sent with the workout log
    ///
    /// Strength records produce one row per set; a set without a recorded
    /// weight is sent with weight 0.
    pub fn details(&self) -> Vec<WorkoutDetail> {
        match self {
            Self::Strength {
                exercise,
                reps_per_set,
                weight_per_set,
            } => reps_per_set
                .iter()
                .enumerate()
                .map(|(set, reps)| WorkoutDetail {
                    name: exercise.clone(),
                    reps: *reps,
                    weight: weight_per_set.get(set).copied().unwrap_or(0.0),
                    ..WorkoutDetail::empty()
                })
                .collect(),
            Self::Cardio {
                exercise,
                distance,
                avg_speed,
                max_speed,
                calories,
                time,
            } => vec![WorkoutDetail {
                name: exercise.clone(),
                distance: *distance,
                avg_speed: *avg_speed,
                max_speed: *max_speed,
                calories_burned: *calories,
                time: *time,
                ..WorkoutDetail::empty()
            }],
        }
    }
}

/// One row of a logged workout
///
/// History payloads send `null` for values that do not apply to the
/// exercise; those read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDetail {
    pub name: String,
    #[serde(default, deserialize_with = "wire::deserialize_null_default")]
    pub reps: u32,
    #[serde(default, deserialize_with = "wire::deserialize_null_default")]
    pub weight: f64,
    #[serde(default, deserialize_with = "wire::deserialize_null_default")]
    pub distance: f64,
    #[serde(default, deserialize_with = "wire::deserialize_null_default")]
    pub avg_speed: f64,
    #[serde(default, deserialize_with = "wire::deserialize_null_default")]
    pub max_speed: f64,
    #[serde(default, deserialize_with = "wire::deserialize_null_default")]
    pub calories_burned: f64,
    #[serde(default, deserialize_with = "wire::deserialize_null_default")]
    pub time: f64,
}

impl WorkoutDetail {
    fn empty() -> Self {
        Self {
            name: String::new(),
            reps: 0,
            weight: 0.0,
            distance: 0.0,
            avg_speed: 0.0,
            max_speed: 0.0,
            calories_burned: 0.0,
            time: 0.0,
        }
    }
}

/// Flatten exercise records into detail rows, in record order
pub fn workout_details(records: &[ExerciseRecord]) -> Vec<WorkoutDetail> {
    records.iter().flat_map(ExerciseRecord::details).collect()
}

/// Body of `POST /Workouts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub user_id: UserId,
    pub duration_in_seconds: u64,
    pub details: Vec<WorkoutDetail>,
}

impl WorkoutLog {
    pub fn new(user_id: UserId, duration_in_seconds: u64, records: &[ExerciseRecord]) -> Self {
        Self {
            user_id,
            duration_in_seconds,
            details: workout_details(records),
        }
    }
}

/// A workout from the user's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutHistory {
    #[serde(
        deserialize_with = "wire::deserialize_date_time",
        serialize_with = "wire::serialize_date_time"
    )]
    pub date: NaiveDateTime,
    #[serde(default)]
    pub duration_in_seconds: u64,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub details: Vec<WorkoutDetail>,
}

impl WorkoutHistory {
    pub fn exercises(&self) -> Vec<ExerciseGroup> {
        group_details_by_exercise(&self.details)
    }
}

/// Detail rows of one exercise within a workout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseGroup {
    pub name: String,
    pub details: Vec<WorkoutDetail>,
}

/// Group detail rows by exercise name
///
/// Groups keep the order in which each name first appears, rows keep their
/// order within a group.
pub fn group_details_by_exercise(details: &[WorkoutDetail]) -> Vec<ExerciseGroup> {
    let mut groups: Vec<ExerciseGroup> = Vec::new();
    for detail in details {
        match groups.iter_mut().find(|g| g.name == detail.name) {
            Some(group) => group.details.push(detail.clone()),
            None => groups.push(ExerciseGroup {
                name: detail.name.clone(),
                details: vec![detail.clone()],
            }),
        }
    }
    groups
}
