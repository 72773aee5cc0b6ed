//! Player Application Service (Use Case)
//!
//! Orchestrates account-level operations: onboarding, goals, pins,
//! premium and streak freeze, profile reads and account erasure.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use kaizen::catalog::PRESET_GOALS;
use kaizen::{DomainError, Goal, Player, QuestGenerator};

use crate::application::SessionManager;
use crate::services::SyncWriter;

/// A profile read: the player plus whether onboarding is still pending
pub struct Profile {
    pub player: Player,
    pub needs_onboarding: bool,
}

/// Application service for player and goal management
pub struct PlayerService<G: QuestGenerator> {
    sessions: Arc<SessionManager>,
    generator: Arc<G>,
    sync: SyncWriter,
}

impl<G: QuestGenerator> PlayerService<G> {
    pub fn new(sessions: Arc<SessionManager>, generator: Arc<G>, sync: SyncWriter) -> Self {
        Self {
            sessions,
            generator,
            sync,
        }
    }

    pub async fn profile(&self, account_id: Uuid) -> Result<Profile, DomainError> {
        let session = self.sessions.session(account_id).await;
        let session = session.lock().await;
        Ok(Profile {
            player: session.player.clone(),
            needs_onboarding: session.needs_onboarding || !session.player.onboarding_complete,
        })
    }

    /// Finish onboarding with a first goal, given either a preset id or
    /// free text. Theme generation failure aborts; the account stays in
    /// the onboarding-needed state.
    pub async fn complete_onboarding(
        &self,
        account_id: Uuid,
        goal: String,
        context: Option<String>,
    ) -> Result<Player, DomainError> {
        let label = PRESET_GOALS
            .iter()
            .find(|p| p.id == goal)
            .map(|p| p.label.to_string())
            .unwrap_or_else(|| goal.trim().to_string());
        if label.is_empty() {
            return Err(DomainError::Validation("goal label is empty".to_string()));
        }

        let goal = self.build_goal(label, context).await?;

        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        session.player.goals.push(goal);
        session.player.onboarding_complete = true;
        session.needs_onboarding = false;
        self.sync.mark_dirty(account_id);

        info!("account {} completed onboarding", account_id);
        Ok(session.player.clone())
    }

    /// Add a goal to an onboarded account
    pub async fn add_goal(
        &self,
        account_id: Uuid,
        label: String,
        context: Option<String>,
    ) -> Result<Player, DomainError> {
        let label = label.trim().to_string();
        if label.is_empty() {
            return Err(DomainError::Validation("goal label is empty".to_string()));
        }
        let goal = self.build_goal(label, context).await?;

        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        session.player.goals.push(goal);
        self.sync.mark_dirty(account_id);
        Ok(session.player.clone())
    }

    /// Soft-delete: the goal leaves active rotation but keeps its record
    pub async fn archive_goal(&self, account_id: Uuid, goal_id: Uuid) -> Result<Player, DomainError> {
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        if !session.player.archive_goal(goal_id, Utc::now()) {
            return Err(DomainError::not_found("Goal", goal_id));
        }
        self.sync.mark_dirty(account_id);
        Ok(session.player.clone())
    }

    /// Hard-delete a goal
    pub async fn remove_goal(&self, account_id: Uuid, goal_id: Uuid) -> Result<Player, DomainError> {
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        if !session.player.remove_goal(goal_id) {
            return Err(DomainError::not_found("Goal", goal_id));
        }
        self.sync.mark_dirty(account_id);
        Ok(session.player.clone())
    }

    /// Pin or unpin a quest title. Returns the new pinned state.
    pub async fn toggle_pinned(&self, account_id: Uuid, title: String) -> Result<bool, DomainError> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::Validation("quest title is empty".to_string()));
        }
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        let pinned = session.player.toggle_pinned(&title);
        self.sync.mark_dirty(account_id);
        Ok(pinned)
    }

    /// Flip the premium flag. Returns the new state.
    pub async fn toggle_premium(&self, account_id: Uuid) -> Result<bool, DomainError> {
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        session.player.premium = !session.player.premium;
        self.sync.mark_dirty(account_id);
        Ok(session.player.premium)
    }

    /// Spend the weekly streak freeze on today
    pub async fn use_streak_freeze(&self, account_id: Uuid) -> Result<Player, DomainError> {
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        if !session.player.premium {
            return Err(DomainError::Validation(
                "streak freeze is a premium feature".to_string(),
            ));
        }
        if !session.player.use_streak_freeze(Utc::now()) {
            return Err(DomainError::QuotaExceeded(
                "streak freeze already used this week".to_string(),
            ));
        }
        self.sync.mark_dirty(account_id);
        Ok(session.player.clone())
    }

    /// Erase every stored document for the account
    pub async fn delete_account(&self, account_id: Uuid) -> Result<bool, DomainError> {
        let deleted = self.sessions.delete_account(account_id).await?;
        if deleted {
            info!("account {} erased", account_id);
        }
        Ok(deleted)
    }

    async fn build_goal(&self, label: String, context: Option<String>) -> Result<Goal, DomainError> {
        let themes = self
            .generator
            .generate_themes_for_goal(&label, context.as_deref())
            .await?
            .into_iter()
            .map(|t| t.into_theme())
            .collect();
        Ok(Goal::new(label, context, themes))
    }
}
