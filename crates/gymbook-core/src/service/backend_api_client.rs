//! HTTP client for the gym backend API.
//!
//! Implements the repository traits over the backend's REST endpoints.
//! Requests carry a bearer token once one is set; any non-2xx response
//! becomes an error carrying the status and response body.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::RwLock;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::domain::{
    Appointment, AppointmentCheck, AppointmentId, AppointmentRequest, Competition, CompetitionId,
    DayAvailability, Enrollment, ExerciseRecord, ExerciseSample, MachineType, NewCompetition,
    UserAppointments, UserId, UserProfile, WorkingHours, WorkoutHistory, WorkoutLog,
};
use crate::repository::{
    AppointmentRepository, CompetitionRepository, RepoResult, UserRepository, WorkoutRepository,
};

/// Body of `POST /Appointments/SetWorkingHours`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct WorkingHoursBody {
    start_hour: u8,
    end_hour: u8,
}

/// Client for the gym backend
pub struct GymApiClient {
    config: ClientConfig,
    client: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl GymApiClient {
    /// Create a new backend client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            config: config.clone(),
            client,
            token: RwLock::new(None),
        })
    }

    /// Use `token` as bearer token for every request
    pub fn with_token(self, token: impl Into<String>) -> Self {
        *self.token.write() = Some(token.into());
        self
    }

    /// Replace or clear the bearer token (login / logout)
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        debug!(%method, %url, "[GymApiClient] Request");
        let request = self.client.request(method, url);
        match self.token.read().as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", what))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} failed with status {}: {}", what, status, body);
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let response = self.send(self.request(reqwest::Method::GET, path), what).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", what))
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B, what: &str) -> Result<Response> {
        self.send(self.request(reqwest::Method::POST, path).json(body), what)
            .await
    }

    async fn delete(&self, path: &str, what: &str) -> Result<()> {
        self.send(self.request(reqwest::Method::DELETE, path), what)
            .await?;
        Ok(())
    }
}

/// Interpret a loosely typed yes/no answer from the backend
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

#[async_trait]
impl AppointmentRepository for GymApiClient {
    async fn list_availability(&self) -> RepoResult<Vec<DayAvailability>> {
        let days: Vec<DayAvailability> = self.get_json("Appointments", "availability").await?;
        for day in &days {
            day.validate()
                .with_context(|| format!("Invalid availability for {}", day.date))?;
        }
        debug!(days = days.len(), "[GymApiClient] Fetched availability");
        Ok(days)
    }

    async fn list_for_user(&self, user_id: UserId) -> RepoResult<Vec<Appointment>> {
        self.get_json(&format!("Appointments/user/{}", user_id), "user appointments")
            .await
    }

    async fn list_with_machines_for_user(&self, user_id: UserId) -> RepoResult<Vec<Appointment>> {
        self.get_json(
            &format!("Appointments/appointments-with-machines-for-user/{}", user_id),
            "user appointments with machines",
        )
        .await
    }

    async fn list_users_with_appointments(&self) -> RepoResult<Vec<UserAppointments>> {
        self.get_json("Appointments/users", "users with appointments")
            .await
    }

    async fn book(&self, request: &AppointmentRequest) -> RepoResult<()> {
        self.post_json("Appointments/book", request, "book appointment")
            .await?;
        info!(
            user_id = %request.user_id,
            date = %request.date,
            machines = request.machines.len(),
            "[GymApiClient] Booked appointment"
        );
        Ok(())
    }

    async fn cancel(&self, id: AppointmentId) -> RepoResult<()> {
        self.delete(&format!("Appointments/{}", id), "cancel appointment")
            .await
    }

    async fn has_appointment_at(&self, user_id: UserId, date: NaiveDateTime) -> RepoResult<bool> {
        let body = AppointmentCheck { user_id, date };
        let response = self
            .post_json("Appointments/checkAppointment", &body, "check appointment")
            .await?;
        let text = response
            .text()
            .await
            .context("Failed to read check appointment response")?;
        if text.trim().is_empty() {
            return Ok(false);
        }
        let value: serde_json::Value =
            serde_json::from_str(&text).context("Failed to parse check appointment response")?;
        Ok(is_truthy(&value))
    }

    async fn set_working_hours(&self, hours: &WorkingHours) -> RepoResult<()> {
        let body = WorkingHoursBody {
            start_hour: hours.start_hour(),
            end_hour: hours.end_hour(),
        };
        self.post_json("Appointments/SetWorkingHours", &body, "set working hours")
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CompetitionRepository for GymApiClient {
    async fn create(&self, competition: &NewCompetition) -> RepoResult<Competition> {
        let response = self
            .post_json("competitions", competition, "create competition")
            .await?;
        response
            .json()
            .await
            .context("Failed to parse created competition")
    }

    async fn list_with_users(&self) -> RepoResult<Vec<Competition>> {
        self.get_json("Competitions/competitions-with-users", "competitions")
            .await
    }

    async fn get_with_users(&self, id: CompetitionId) -> RepoResult<Competition> {
        self.get_json(
            &format!("Competitions/competition-with-users/{}", id),
            "competition with users",
        )
        .await
    }

    async fn get_for_user(&self, user_id: UserId) -> RepoResult<Option<Competition>> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("Competitions/competition-for-user/{}", user_id),
        );
        let response = request
            .send()
            .await
            .context("Failed to send competition for user request")?;

        // Not enrolled
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("competition for user failed with status {}: {}", status, body);
        }

        let competition = response
            .json()
            .await
            .context("Failed to parse competition for user")?;
        Ok(Some(competition))
    }

    async fn enroll(&self, enrollment: &Enrollment) -> RepoResult<()> {
        self.post_json("Competitions/enroll", enrollment, "enroll")
            .await?;
        Ok(())
    }

    async fn unenroll(&self, user_id: UserId) -> RepoResult<()> {
        self.delete(&format!("Competitions/unenroll/{}", user_id), "unenroll")
            .await
    }

    async fn remove_user(&self, competition_id: CompetitionId, user_id: UserId) -> RepoResult<()> {
        self.delete(
            &format!("Competitions/remove-user/{}/{}", competition_id, user_id),
            "remove user",
        )
        .await
    }
}

#[async_trait]
impl WorkoutRepository for GymApiClient {
    async fn generate_exercise_data(&self, sample: &ExerciseSample) -> RepoResult<ExerciseRecord> {
        let path = match sample.machine_type {
            MachineType::Strength => "Workouts/GenerateStrengthExerciseData",
            MachineType::Cardio => "Workouts/GenerateCardioExerciseData",
        };
        let response = self.post_json(path, sample, "generate exercise data").await?;
        response
            .json()
            .await
            .context("Failed to parse generated exercise data")
    }

    async fn log_workout(&self, log: &WorkoutLog) -> RepoResult<()> {
        self.post_json("Workouts", log, "log workout").await?;
        info!(
            user_id = %log.user_id,
            duration_in_seconds = log.duration_in_seconds,
            details = log.details.len(),
            "[GymApiClient] Logged workout"
        );
        Ok(())
    }

    async fn list_history(&self, user_id: UserId) -> RepoResult<Vec<WorkoutHistory>> {
        self.get_json(
            &format!("Workouts/user-workout-history/{}", user_id),
            "workout history",
        )
        .await
    }
}

#[async_trait]
impl UserRepository for GymApiClient {
    async fn get_profile(&self, user_id: UserId) -> RepoResult<UserProfile> {
        self.get_json(&format!("Users/profile/{}", user_id), "user profile")
            .await
    }
}
