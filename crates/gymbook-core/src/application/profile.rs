//! Profile Application Service
//!
//! Read-only access to member profiles, for the member's own profile screen
//! and the trainer's member view.

use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use crate::domain::{UserId, UserProfile};
use crate::repository::UserRepository;

/// Application service for user profiles
pub struct ProfileAppService {
    user_repo: Arc<dyn UserRepository>,
}

impl ProfileAppService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    pub async fn profile(&self, user_id: UserId) -> Result<UserProfile> {
        let profile = self.user_repo.get_profile(user_id).await?;
        debug!(user_id = %user_id, username = %profile.username, "[ProfileAppService] Loaded profile");
        Ok(profile)
    }
}
