//! In-memory fakes for application-level tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use kaizen::{
    Category, Celebration, DailyQuests, DailyQuestsRepository, Difficulty, DomainError,
    GeneratedQuest, GeneratedTheme, HistoryRepository, Notifier, Player, PlayerRepository,
    QuestBatchRequest, QuestGenerator, QuestHistoryEntry, StoryRequest,
};

#[derive(Default)]
pub struct InMemoryStore {
    pub players: Mutex<HashMap<Uuid, Player>>,
    pub dailies: Mutex<HashMap<Uuid, DailyQuests>>,
    pub histories: Mutex<HashMap<Uuid, Vec<QuestHistoryEntry>>>,
    pub saves: AtomicUsize,
    pub fail_saves: AtomicBool,
}

pub struct StorePlayerRepo(pub Arc<InMemoryStore>);
pub struct StoreDailyRepo(pub Arc<InMemoryStore>);
pub struct StoreHistoryRepo(pub Arc<InMemoryStore>);

impl InMemoryStore {
    fn check_save(&self) -> Result<(), DomainError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::Repository("save disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for StorePlayerRepo {
    async fn load(&self, account_id: Uuid) -> Result<Option<Player>, DomainError> {
        Ok(self.0.players.lock().unwrap().get(&account_id).cloned())
    }

    async fn save(&self, account_id: Uuid, player: &Player) -> Result<(), DomainError> {
        self.0.check_save()?;
        self.0.saves.fetch_add(1, Ordering::SeqCst);
        self.0
            .players
            .lock()
            .unwrap()
            .insert(account_id, player.clone());
        Ok(())
    }

    async fn delete(&self, account_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.0.players.lock().unwrap().remove(&account_id).is_some())
    }
}

#[async_trait]
impl DailyQuestsRepository for StoreDailyRepo {
    async fn load(&self, account_id: Uuid) -> Result<Option<DailyQuests>, DomainError> {
        Ok(self.0.dailies.lock().unwrap().get(&account_id).cloned())
    }

    async fn save(&self, account_id: Uuid, daily: &DailyQuests) -> Result<(), DomainError> {
        self.0.check_save()?;
        self.0
            .dailies
            .lock()
            .unwrap()
            .insert(account_id, daily.clone());
        Ok(())
    }

    async fn delete(&self, account_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.0.dailies.lock().unwrap().remove(&account_id).is_some())
    }
}

#[async_trait]
impl HistoryRepository for StoreHistoryRepo {
    async fn load(&self, account_id: Uuid) -> Result<Vec<QuestHistoryEntry>, DomainError> {
        Ok(self
            .0
            .histories
            .lock()
            .unwrap()
            .get(&account_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(
        &self,
        account_id: Uuid,
        entries: &[QuestHistoryEntry],
    ) -> Result<(), DomainError> {
        self.0.check_save()?;
        self.0
            .histories
            .lock()
            .unwrap()
            .insert(account_id, entries.to_vec());
        Ok(())
    }

    async fn delete(&self, account_id: Uuid) -> Result<bool, DomainError> {
        Ok(self
            .0
            .histories
            .lock()
            .unwrap()
            .remove(&account_id)
            .is_some())
    }
}

/// Deterministic generator: numbered quests, two themes per goal, a
/// fixed story and message. Flip the flags to simulate outages.
#[derive(Default)]
pub struct ScriptedGenerator {
    pub fail_batches: AtomicBool,
    pub fail_stories: AtomicBool,
    pub batch_calls: AtomicUsize,
}

#[async_trait]
impl QuestGenerator for ScriptedGenerator {
    async fn generate_quest_batch(
        &self,
        request: &QuestBatchRequest,
    ) -> Result<Vec<GeneratedQuest>, DomainError> {
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(DomainError::ExternalService("generator down".to_string()));
        }
        let call = self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let total = request.count + request.pinned_titles.len();
        Ok((0..total)
            .map(|i| GeneratedQuest {
                title: format!("Quest {}-{}", call, i),
                category: Category::Body,
                difficulty: Difficulty::Easy,
                goal_id: None,
                theme_id: None,
                description: None,
                estimated_time: None,
                is_pinned: false,
            })
            .collect())
    }

    async fn generate_themes_for_goal(
        &self,
        label: &str,
        _context: Option<&str>,
    ) -> Result<Vec<GeneratedTheme>, DomainError> {
        Ok(vec![
            GeneratedTheme {
                id: format!("{}-a", label.to_lowercase()),
                name: format!("{} A", label),
            },
            GeneratedTheme {
                id: format!("{}-b", label.to_lowercase()),
                name: format!("{} B", label),
            },
        ])
    }

    async fn generate_level_up_story(
        &self,
        _request: &StoryRequest,
    ) -> Result<String, DomainError> {
        if self.fail_stories.load(Ordering::SeqCst) {
            return Err(DomainError::ExternalService("generator down".to_string()));
        }
        Ok("Un nouveau chapitre commence.".to_string())
    }

    async fn generate_completion_message(&self, _quest_title: &str) -> Result<String, DomainError> {
        Ok("Bien jou\u{e9}.".to_string())
    }
}

/// Notifier that records everything it is handed
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<Celebration>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, _account_id: Uuid, celebration: &Celebration) {
        self.events.lock().unwrap().push(celebration.clone());
    }
}
