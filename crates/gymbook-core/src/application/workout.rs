//! Workout Application Service
//!
//! Starting a workout, scanning machines and logging the result.

use anyhow::Result;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{
    truncate_to_hour, DomainEvent, ExerciseRecord, ExerciseSample, Machine, UserId,
    WorkoutHistory, WorkoutLog,
};
use crate::event_bus::EventSender;
use crate::repository::{AppointmentRepository, WorkoutRepository};
use crate::service::{check_machine_access, MachineAccess, WorkoutWindow};

/// Application service for workouts
pub struct WorkoutAppService {
    appointment_repo: Arc<dyn AppointmentRepository>,
    workout_repo: Arc<dyn WorkoutRepository>,
    event_sender: EventSender,
}

impl WorkoutAppService {
    pub fn new(
        appointment_repo: Arc<dyn AppointmentRepository>,
        workout_repo: Arc<dyn WorkoutRepository>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            appointment_repo,
            workout_repo,
            event_sender,
        }
    }

    /// Workout window for `now`, if the user booked the current hour
    pub async fn can_start(&self, user_id: UserId, now: NaiveDateTime) -> Result<Option<WorkoutWindow>> {
        let hour_start = truncate_to_hour(now);
        let booked = self
            .appointment_repo
            .has_appointment_at(user_id, hour_start)
            .await?;

        debug!(user_id = %user_id, %hour_start, booked, "[WorkoutAppService] Checked appointment");

        Ok(booked.then(|| WorkoutWindow::starting(now)))
    }

    /// Check a scanned machine code
    pub async fn scan_machine(
        &self,
        user_id: UserId,
        now: NaiveDateTime,
        machine_name: &str,
    ) -> Result<MachineAccess> {
        let mine = self
            .appointment_repo
            .list_with_machines_for_user(user_id)
            .await?;
        let days = self.appointment_repo.list_availability().await?;
        Ok(check_machine_access(&days, &mine, now, machine_name))
    }

    /// Have the backend turn time spent on `machine` into exercise data
    pub async fn record_exercise(&self, machine: &Machine, duration_secs: u64) -> Result<ExerciseRecord> {
        let sample = ExerciseSample {
            exercise_name: machine.name.clone(),
            duration: duration_secs,
            machine_type: machine.machine_type,
        };
        let record = self.workout_repo.generate_exercise_data(&sample).await?;

        debug!(
            machine = %machine.name,
            duration_secs,
            "[WorkoutAppService] Recorded exercise"
        );
        Ok(record)
    }

    /// Log a finished workout
    ///
    /// Logged workouts earn competition points, so listeners of competition
    /// standings are notified.
    ///
    /// Emits: `CompetitionModified`
    pub async fn finish(
        &self,
        user_id: UserId,
        duration_in_seconds: u64,
        records: &[ExerciseRecord],
    ) -> Result<WorkoutLog> {
        let log = WorkoutLog::new(user_id, duration_in_seconds, records);
        self.workout_repo.log_workout(&log).await?;

        info!(
            user_id = %user_id,
            duration_in_seconds,
            exercises = records.len(),
            "[WorkoutAppService] Workout finished"
        );

        self.event_sender
            .emit(DomainEvent::CompetitionModified { competition_id: None });

        Ok(log)
    }

    /// Logged workouts of a user, most recent first
    pub async fn history(&self, user_id: UserId) -> Result<Vec<WorkoutHistory>> {
        let mut workouts = self.workout_repo.list_history(user_id).await?;
        workouts.sort_by(|a, b| b.date.cmp(&a.date));

        debug!(user_id = %user_id, workouts = workouts.len(), "[WorkoutAppService] Loaded history");
        Ok(workouts)
    }
}
