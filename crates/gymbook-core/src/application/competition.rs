//! Competition Application Service
//!
//! Manages competitions and their membership with automatic event emission.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::domain::{
    Competition, CompetitionDraft, CompetitionId, DomainEvent, Enrollment, UserId,
};
use crate::error::CompetitionError;
use crate::event_bus::EventSender;
use crate::repository::CompetitionRepository;

/// Application service for competitions
pub struct CompetitionAppService {
    competition_repo: Arc<dyn CompetitionRepository>,
    event_sender: EventSender,
}

impl CompetitionAppService {
    pub fn new(competition_repo: Arc<dyn CompetitionRepository>, event_sender: EventSender) -> Self {
        Self {
            competition_repo,
            event_sender,
        }
    }

    /// Create a competition from a trainer's draft
    ///
    /// Emits: `CompetitionCreated`
    pub async fn create(&self, draft: CompetitionDraft) -> Result<Competition> {
        let new_competition = draft.validate()?;
        let competition = self.competition_repo.create(&new_competition).await?;

        info!(
            competition_id = %competition.id,
            name = %competition.name,
            "[CompetitionAppService] Created competition"
        );

        self.event_sender.emit(DomainEvent::CompetitionCreated {
            competition_id: Some(competition.id),
            name: competition.name.clone(),
        });

        Ok(competition)
    }

    /// All competitions with their enrolled users
    pub async fn list(&self) -> Result<Vec<Competition>> {
        self.competition_repo.list_with_users().await
    }

    /// One competition with its leaderboard (trainer detail view)
    pub async fn details(&self, competition_id: CompetitionId) -> Result<Competition> {
        self.competition_repo.get_with_users(competition_id).await
    }

    /// Competition the user takes part in, `None` when not enrolled
    pub async fn standings_for_user(&self, user_id: UserId) -> Result<Option<Competition>> {
        self.competition_repo.get_for_user(user_id).await
    }

    /// Join a competition by its code
    ///
    /// Emits: `CompetitionModified`
    pub async fn enroll(&self, user_id: UserId, competition_code: &str) -> Result<()> {
        let code = competition_code.trim();
        if code.is_empty() {
            return Err(CompetitionError::MissingField("code").into());
        }

        let enrollment = Enrollment {
            user_id,
            competition_code: code.to_string(),
        };
        self.competition_repo.enroll(&enrollment).await?;

        info!(user_id = %user_id, code, "[CompetitionAppService] Enrolled user");

        self.event_sender
            .emit(DomainEvent::CompetitionModified { competition_id: None });

        Ok(())
    }

    /// Leave the current competition
    ///
    /// Emits: `CompetitionModified`
    pub async fn unenroll(&self, user_id: UserId) -> Result<()> {
        self.competition_repo.unenroll(user_id).await?;

        info!(user_id = %user_id, "[CompetitionAppService] Unenrolled user");

        self.event_sender
            .emit(DomainEvent::CompetitionModified { competition_id: None });

        Ok(())
    }

    /// Remove a user from a competition (trainer action)
    ///
    /// Emits: `CompetitionModified`
    pub async fn remove_user(&self, competition_id: CompetitionId, user_id: UserId) -> Result<()> {
        self.competition_repo
            .remove_user(competition_id, user_id)
            .await?;

        info!(
            competition_id = %competition_id,
            user_id = %user_id,
            "[CompetitionAppService] Removed user from competition"
        );

        self.event_sender.emit(DomainEvent::CompetitionModified {
            competition_id: Some(competition_id),
        });

        Ok(())
    }
}
