//! Repository traits for backend access
//!
//! The gym backend owns scheduling, scoring and persistence. These traits
//! describe what the client needs from it without tying callers to HTTP;
//! `GymApiClient` implements all of them, tests use in-memory mocks.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::domain::{
    Appointment, AppointmentId, AppointmentRequest, Competition, CompetitionId, DayAvailability,
    Enrollment, ExerciseRecord, ExerciseSample, NewCompetition, UserAppointments, UserId,
    UserProfile, WorkingHours, WorkoutHistory, WorkoutLog,
};

/// Result type for repository operations
pub type RepoResult<T> = anyhow::Result<T>;

/// Appointment repository trait
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Availability of every day the backend knows about
    async fn list_availability(&self) -> RepoResult<Vec<DayAvailability>>;

    /// Appointments of one user
    async fn list_for_user(&self, user_id: UserId) -> RepoResult<Vec<Appointment>>;

    /// Appointments of one user, including reserved machines
    async fn list_with_machines_for_user(&self, user_id: UserId) -> RepoResult<Vec<Appointment>>;

    /// Every user with their appointments (trainer view)
    async fn list_users_with_appointments(&self) -> RepoResult<Vec<UserAppointments>>;

    /// Book an hour, optionally with machines
    async fn book(&self, request: &AppointmentRequest) -> RepoResult<()>;

    /// Cancel an appointment
    async fn cancel(&self, id: AppointmentId) -> RepoResult<()>;

    /// Whether the user holds an appointment starting at `date`
    async fn has_appointment_at(&self, user_id: UserId, date: NaiveDateTime) -> RepoResult<bool>;

    /// Change the bookable hours
    async fn set_working_hours(&self, hours: &WorkingHours) -> RepoResult<()>;
}

/// Competition repository trait
#[async_trait]
pub trait CompetitionRepository: Send + Sync {
    async fn create(&self, competition: &NewCompetition) -> RepoResult<Competition>;

    /// All competitions with their enrolled users
    async fn list_with_users(&self) -> RepoResult<Vec<Competition>>;

    /// One competition with its enrolled users
    async fn get_with_users(&self, id: CompetitionId) -> RepoResult<Competition>;

    /// Competition the user is enrolled in, if any
    async fn get_for_user(&self, user_id: UserId) -> RepoResult<Option<Competition>>;

    async fn enroll(&self, enrollment: &Enrollment) -> RepoResult<()>;

    /// Leave the user's current competition
    async fn unenroll(&self, user_id: UserId) -> RepoResult<()>;

    /// Remove a user from a competition (trainer action)
    async fn remove_user(&self, competition_id: CompetitionId, user_id: UserId) -> RepoResult<()>;
}

/// Workout repository trait
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Have the backend generate exercise data for time spent on a machine
    async fn generate_exercise_data(&self, sample: &ExerciseSample) -> RepoResult<ExerciseRecord>;

    /// Store a finished workout
    async fn log_workout(&self, log: &WorkoutLog) -> RepoResult<()>;

    /// Logged workouts of one user
    async fn list_history(&self, user_id: UserId) -> RepoResult<Vec<WorkoutHistory>>;
}

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_profile(&self, user_id: UserId) -> RepoResult<UserProfile>;
}
