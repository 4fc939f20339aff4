//! Mock repository implementations for testing
//!
//! In-memory implementations of all repository traits for fast, isolated
//! tests. Each mock records the writes it received and can be told to fail.

use anyhow::bail;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use gymbook_core::{
    domain::{
        Appointment, AppointmentId, AppointmentRequest, Competition, CompetitionId,
        DayAvailability, Enrollment, ExerciseRecord, ExerciseSample, MachineType, NewCompetition,
        Standing, UserAppointments, UserId, UserProfile, WorkingHours, WorkoutHistory, WorkoutLog,
    },
    repository::{
        AppointmentRepository, CompetitionRepository, RepoResult, UserRepository,
        WorkoutRepository,
    },
};

// ============================================================================
// MockAppointmentRepository
// ============================================================================

#[derive(Default)]
pub struct MockAppointmentRepository {
    days: RwLock<Vec<DayAvailability>>,
    appointments: RwLock<HashMap<UserId, Vec<Appointment>>>,
    users: RwLock<Vec<UserAppointments>>,
    booked: RwLock<Vec<AppointmentRequest>>,
    cancelled: RwLock<Vec<AppointmentId>>,
    working_hours: RwLock<Option<WorkingHours>>,
    fail_writes: AtomicBool,
}

impl MockAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(self, day: DayAvailability) -> Self {
        self.days.write().unwrap().push(day);
        self
    }

    pub fn with_appointment(self, user_id: UserId, appointment: Appointment) -> Self {
        self.appointments
            .write()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(appointment);
        self
    }

    pub fn with_user(self, user: UserAppointments) -> Self {
        self.users.write().unwrap().push(user);
        self
    }

    /// Make every write fail as if the backend rejected it
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn booked(&self) -> Vec<AppointmentRequest> {
        self.booked.read().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<AppointmentId> {
        self.cancelled.read().unwrap().clone()
    }

    pub fn working_hours(&self) -> Option<WorkingHours> {
        *self.working_hours.read().unwrap()
    }

    fn check_write(&self) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("backend rejected the request");
        }
        Ok(())
    }
}

#[async_trait]
impl AppointmentRepository for MockAppointmentRepository {
    async fn list_availability(&self) -> RepoResult<Vec<DayAvailability>> {
        Ok(self.days.read().unwrap().clone())
    }

    async fn list_for_user(&self, user_id: UserId) -> RepoResult<Vec<Appointment>> {
        Ok(self
            .appointments
            .read()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_with_machines_for_user(&self, user_id: UserId) -> RepoResult<Vec<Appointment>> {
        self.list_for_user(user_id).await
    }

    async fn list_users_with_appointments(&self) -> RepoResult<Vec<UserAppointments>> {
        Ok(self.users.read().unwrap().clone())
    }

    async fn book(&self, request: &AppointmentRequest) -> RepoResult<()> {
        self.check_write()?;
        self.booked.write().unwrap().push(request.clone());
        Ok(())
    }

    async fn cancel(&self, id: AppointmentId) -> RepoResult<()> {
        self.check_write()?;
        self.cancelled.write().unwrap().push(id);
        Ok(())
    }

    async fn has_appointment_at(&self, user_id: UserId, date: NaiveDateTime) -> RepoResult<bool> {
        Ok(self
            .appointments
            .read()
            .unwrap()
            .get(&user_id)
            .is_some_and(|list| list.iter().any(|a| a.starts_at() == date)))
    }

    async fn set_working_hours(&self, hours: &WorkingHours) -> RepoResult<()> {
        self.check_write()?;
        *self.working_hours.write().unwrap() = Some(*hours);
        Ok(())
    }
}

// ============================================================================
// MockCompetitionRepository
// ============================================================================

#[derive(Default)]
pub struct MockCompetitionRepository {
    competitions: RwLock<Vec<Competition>>,
    next_id: AtomicI64,
    fail_writes: AtomicBool,
}

impl MockCompetitionRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    pub fn with_competition(self, competition: Competition) -> Self {
        self.competitions.write().unwrap().push(competition);
        self
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn competitions(&self) -> Vec<Competition> {
        self.competitions.read().unwrap().clone()
    }

    fn check_write(&self) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("backend rejected the request");
        }
        Ok(())
    }
}

#[async_trait]
impl CompetitionRepository for MockCompetitionRepository {
    async fn create(&self, competition: &NewCompetition) -> RepoResult<Competition> {
        self.check_write()?;
        let id = CompetitionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let created = Competition {
            id,
            name: competition.name.clone(),
            competition_type: competition.competition_type,
            description: competition.description.clone(),
            start_date: competition.start_date,
            end_date: competition.end_date,
            machines: competition.machines.clone(),
            code: Some(format!("CODE{}", id)),
            users: Vec::new(),
        };
        self.competitions.write().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list_with_users(&self) -> RepoResult<Vec<Competition>> {
        Ok(self.competitions())
    }

    async fn get_with_users(&self, id: CompetitionId) -> RepoResult<Competition> {
        let competitions = self.competitions.read().unwrap();
        match competitions.iter().find(|c| c.id == id) {
            Some(competition) => Ok(competition.clone()),
            None => bail!("competition {} not found", id),
        }
    }

    async fn get_for_user(&self, user_id: UserId) -> RepoResult<Option<Competition>> {
        Ok(self
            .competitions
            .read()
            .unwrap()
            .iter()
            .find(|c| c.users.iter().any(|s| s.user_id == user_id))
            .cloned())
    }

    async fn enroll(&self, enrollment: &Enrollment) -> RepoResult<()> {
        self.check_write()?;
        let mut competitions = self.competitions.write().unwrap();
        let Some(competition) = competitions
            .iter_mut()
            .find(|c| c.code.as_deref() == Some(enrollment.competition_code.as_str()))
        else {
            bail!("unknown competition code {}", enrollment.competition_code);
        };
        competition.users.push(Standing {
            user_id: enrollment.user_id,
            username: format!("user{}", enrollment.user_id),
            points: 0,
        });
        Ok(())
    }

    async fn unenroll(&self, user_id: UserId) -> RepoResult<()> {
        self.check_write()?;
        for competition in self.competitions.write().unwrap().iter_mut() {
            competition.users.retain(|s| s.user_id != user_id);
        }
        Ok(())
    }

    async fn remove_user(&self, competition_id: CompetitionId, user_id: UserId) -> RepoResult<()> {
        self.check_write()?;
        let mut competitions = self.competitions.write().unwrap();
        if let Some(competition) = competitions.iter_mut().find(|c| c.id == competition_id) {
            competition.users.retain(|s| s.user_id != user_id);
        }
        Ok(())
    }
}

// ============================================================================
// MockWorkoutRepository
// ============================================================================

#[derive(Default)]
pub struct MockWorkoutRepository {
    samples: RwLock<Vec<ExerciseSample>>,
    logs: RwLock<Vec<WorkoutLog>>,
    history: RwLock<HashMap<UserId, Vec<WorkoutHistory>>>,
    fail_writes: AtomicBool,
}

impl MockWorkoutRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn samples(&self) -> Vec<ExerciseSample> {
        self.samples.read().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<WorkoutLog> {
        self.logs.read().unwrap().clone()
    }

    pub fn with_history(self, user_id: UserId, workout: WorkoutHistory) -> Self {
        self.history
            .write()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(workout);
        self
    }
}

#[async_trait]
impl WorkoutRepository for MockWorkoutRepository {
    async fn generate_exercise_data(&self, sample: &ExerciseSample) -> RepoResult<ExerciseRecord> {
        self.samples.write().unwrap().push(sample.clone());
        // One set per started minute, one km per 5 minutes of cardio
        let minutes = sample.duration.div_ceil(60);
        Ok(match sample.machine_type {
            MachineType::Strength => ExerciseRecord::Strength {
                exercise: sample.exercise_name.clone(),
                reps_per_set: vec![10; minutes as usize],
                weight_per_set: vec![50.0; minutes as usize],
            },
            MachineType::Cardio => ExerciseRecord::Cardio {
                exercise: sample.exercise_name.clone(),
                distance: minutes as f64 / 5.0,
                avg_speed: 12.0,
                max_speed: 14.0,
                calories: minutes as f64 * 10.0,
                time: sample.duration as f64,
            },
        })
    }

    async fn log_workout(&self, log: &WorkoutLog) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("backend rejected the request");
        }
        self.logs.write().unwrap().push(log.clone());
        Ok(())
    }

    async fn list_history(&self, user_id: UserId) -> RepoResult<Vec<WorkoutHistory>> {
        Ok(self
            .history
            .read()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// MockUserRepository
// ============================================================================

#[derive(Default)]
pub struct MockUserRepository {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, user_id: UserId, profile: UserProfile) -> Self {
        self.profiles.write().unwrap().insert(user_id, profile);
        self
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn get_profile(&self, user_id: UserId) -> RepoResult<UserProfile> {
        match self.profiles.read().unwrap().get(&user_id) {
            Some(profile) => Ok(profile.clone()),
            None => bail!("user {} not found", user_id),
        }
    }
}

// ============================================================================
// MockRepositories
// ============================================================================

/// One of every mock, shared through `Arc`
pub struct MockRepositories {
    pub appointments: Arc<MockAppointmentRepository>,
    pub competitions: Arc<MockCompetitionRepository>,
    pub workouts: Arc<MockWorkoutRepository>,
    pub users: Arc<MockUserRepository>,
}

impl MockRepositories {
    /// Create a fresh set of empty mock repositories
    pub fn new() -> Self {
        Self::with_appointments(MockAppointmentRepository::new())
    }

    /// Use a pre-filled appointment repository
    pub fn with_appointments(appointments: MockAppointmentRepository) -> Self {
        Self {
            appointments: Arc::new(appointments),
            competitions: Arc::new(MockCompetitionRepository::new()),
            workouts: Arc::new(MockWorkoutRepository::new()),
            users: Arc::new(MockUserRepository::new()),
        }
    }
}

impl Default for MockRepositories {
    fn default() -> Self {
        Self::new()
    }
}
