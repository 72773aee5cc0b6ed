//! Account Sessions
//!
//! One in-memory `Session` per account holds the authoritative copy of
//! the three documents. Every mutating operation locks the session for
//! its whole read-modify-write, which keeps concurrent requests for the
//! same account serialized without any storage-level locking.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use kaizen::{
    DailyQuests, DailyQuestsRepository, DomainError, HistoryRepository, Player, PlayerRepository,
    QuestHistoryEntry,
};

/// Per-account in-memory state
pub struct Session {
    pub player: Player,
    pub daily: DailyQuests,
    pub history: Vec<QuestHistoryEntry>,
    /// New account (or unreadable documents) that still needs onboarding
    pub needs_onboarding: bool,
}

impl Session {
    /// Discard the daily batch if its date is behind `today`.
    ///
    /// Returns true when a reset happened, which also means quests need
    /// regenerating.
    pub fn reset_if_stale(&mut self, today: NaiveDate) -> bool {
        if self.daily.is_stale(today) {
            self.daily.reset_for(today);
            true
        } else {
            false
        }
    }
}

/// Loads, caches and persists account sessions
pub struct SessionManager {
    players: Arc<dyn PlayerRepository>,
    dailies: Arc<dyn DailyQuestsRepository>,
    histories: Arc<dyn HistoryRepository>,
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionManager {
    pub fn new(
        players: Arc<dyn PlayerRepository>,
        dailies: Arc<dyn DailyQuestsRepository>,
        histories: Arc<dyn HistoryRepository>,
    ) -> Self {
        Self {
            players,
            dailies,
            histories,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Get the cached session for an account, loading it on first use.
    ///
    /// A missing or unreadable player document yields a fresh session
    /// flagged for onboarding; load failures never surface to the caller.
    pub async fn session(&self, account_id: Uuid) -> Arc<Mutex<Session>> {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(&account_id) {
            return Arc::clone(session);
        }

        let session = Arc::new(Mutex::new(self.load(account_id).await));
        sessions.insert(account_id, Arc::clone(&session));
        session
    }

    async fn load(&self, account_id: Uuid) -> Session {
        let today = chrono::Local::now().date_naive();

        let player = match self.players.load(account_id).await {
            Ok(Some(player)) => Some(player),
            Ok(None) => None,
            Err(e) => {
                warn!("player document load failed for {}: {}", account_id, e);
                None
            }
        };
        let needs_onboarding = player.is_none();

        let daily = match self.dailies.load(account_id).await {
            Ok(Some(daily)) => daily,
            Ok(None) => DailyQuests::empty_for(today),
            Err(e) => {
                warn!("daily document load failed for {}: {}", account_id, e);
                DailyQuests::empty_for(today)
            }
        };

        let history = match self.histories.load(account_id).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("history document load failed for {}: {}", account_id, e);
                Vec::new()
            }
        };

        Session {
            player: player.unwrap_or_else(Player::new),
            daily,
            history,
            needs_onboarding,
        }
    }

    /// Write all three documents for an account back to storage
    pub async fn persist(&self, account_id: Uuid) -> Result<(), DomainError> {
        let session = self.session(account_id).await;
        let (player, daily, history) = {
            let session = session.lock().await;
            (
                session.player.clone(),
                session.daily.clone(),
                session.history.clone(),
            )
        };

        self.players.save(account_id, &player).await?;
        self.dailies.save(account_id, &daily).await?;
        self.histories.save(account_id, &history).await?;
        Ok(())
    }

    /// Drop the cached session and delete the stored documents
    pub async fn delete_account(&self, account_id: Uuid) -> Result<bool, DomainError> {
        self.sessions.lock().await.remove(&account_id);
        let existed = self.players.delete(account_id).await?;
        self.dailies.delete(account_id).await?;
        self.histories.delete(account_id).await?;
        Ok(existed)
    }
}
