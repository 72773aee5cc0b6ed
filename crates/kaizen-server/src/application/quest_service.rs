//! Quest Application Service (Use Case)
//!
//! Orchestrates the daily quest lifecycle: generation, selection,
//! completion with celebrations, undo, refreshes, custom quests and
//! feedback. Every mutation runs under the account's session lock and
//! ends with a dirty mark toward the write-behind flusher.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, Utc};
use rand::seq::SliceRandom;
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use kaizen::catalog::{
    GENERIC_COMPLETION_MESSAGES, MAX_BATCH_REFRESHES_PER_DAY, MAX_SINGLE_REFRESHES_PER_DAY,
};
use kaizen::{
    apply_completion, celebrations_for, Category, Celebration, ChapterSummary, DailyQuests,
    DomainError, Feedback, GoalContext, Notifier, QuestBatchRequest, QuestGenerator,
    QuestHistoryEntry, QuestStatus, StoryChapter, StoryRequest, UndoSnapshot,
};

use crate::application::SessionManager;
use crate::services::SyncWriter;

/// How many history titles feed the avoid-list of a batch prompt
const AVOID_LIST_LEN: usize = 15;
/// Recent quests and previous chapters fed into the narrative prompt
const STORY_RECENT_QUESTS: usize = 5;
const STORY_PREVIOUS_CHAPTERS: usize = 2;

/// What a completion call hands back to the HTTP layer
#[derive(Debug)]
pub struct CompletionResult {
    /// None when the completion was an ignored no-op
    pub celebrations: Vec<Celebration>,
    pub completion_message: Option<String>,
    pub applied: bool,
}

/// Application service for the daily quest lifecycle
pub struct QuestService<G: QuestGenerator> {
    sessions: Arc<SessionManager>,
    generator: Arc<G>,
    notifier: Arc<dyn Notifier>,
    sync: SyncWriter,
    undo: Mutex<HashMap<Uuid, UndoSnapshot>>,
}

impl<G: QuestGenerator> QuestService<G> {
    pub fn new(
        sessions: Arc<SessionManager>,
        generator: Arc<G>,
        notifier: Arc<dyn Notifier>,
        sync: SyncWriter,
    ) -> Self {
        Self {
            sessions,
            generator,
            notifier,
            sync,
            undo: Mutex::new(HashMap::new()),
        }
    }

    /// Today's batch, after the daily reset check. Does not generate;
    /// an empty batch tells the client to call generate.
    pub async fn today(&self, account_id: Uuid) -> Result<DailyQuests, DomainError> {
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        if session.reset_if_stale(Local::now().date_naive()) {
            self.sync.mark_dirty(account_id);
        }
        Ok(session.daily.clone())
    }

    /// Generate a fresh batch for today. Replaces whatever the batch
    /// currently holds; generation failure leaves it untouched.
    pub async fn generate(&self, account_id: Uuid) -> Result<DailyQuests, DomainError> {
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        session.reset_if_stale(Local::now().date_naive());

        let request = batch_request(&session.player, &session.history);
        let generated = self.generator.generate_quest_batch(&request).await?;

        session.daily.fill(
            generated
                .into_iter()
                .map(|g| g.into_quest(QuestStatus::Available))
                .collect(),
        );
        self.sync.mark_dirty(account_id);
        Ok(session.daily.clone())
    }

    /// Choose the quest of the day
    pub async fn select(&self, account_id: Uuid, quest_id: Uuid) -> Result<DailyQuests, DomainError> {
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        session.daily.select(quest_id)?;
        self.sync.mark_dirty(account_id);
        Ok(session.daily.clone())
    }

    /// Complete a quest and run the whole progression cascade.
    ///
    /// Invalid local state (unknown id, available or already completed
    /// quest) is reported as a non-applied result, never an error.
    pub async fn complete(
        &self,
        account_id: Uuid,
        quest_id: Uuid,
    ) -> Result<CompletionResult, DomainError> {
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        let now = Utc::now();

        // Snapshot the whole triple before mutating; a newer completion
        // replaces any older snapshot for this account.
        let snapshot = UndoSnapshot {
            player: session.player.clone(),
            daily: session.daily.clone(),
            history: session.history.clone(),
            quest_id,
            taken_at: now,
        };

        let session = &mut *session;
        let outcome = match apply_completion(
            &mut session.player,
            &mut session.daily,
            &mut session.history,
            quest_id,
            now,
        ) {
            Some(outcome) => outcome,
            None => {
                return Ok(CompletionResult {
                    celebrations: Vec::new(),
                    completion_message: None,
                    applied: false,
                })
            }
        };

        self.undo.lock().await.insert(account_id, snapshot);

        let completion_message = self.completion_message(&session.player, &outcome.quest_title).await;
        if let Some(quest) = session.daily.find_mut(quest_id) {
            quest.completion_message = completion_message.clone();
        }

        // The narrative is best-effort: a generator failure still commits
        // the level-up, the celebration just loses its story.
        let story = match &outcome.leveled_up {
            Some(level_up) => {
                let request = story_request(&session.player, &session.history, level_up.level);
                match self.generator.generate_level_up_story(&request).await {
                    Ok(story) => {
                        session.player.story_chapters.push(StoryChapter {
                            level: level_up.level,
                            title: level_up.title.name.to_string(),
                            story: story.clone(),
                            date: now,
                        });
                        Some(story)
                    }
                    Err(e) => {
                        warn!("narrative generation failed for {}: {}", account_id, e);
                        None
                    }
                }
            }
            None => None,
        };

        let celebrations = celebrations_for(&outcome, story);
        for celebration in &celebrations {
            self.notifier.notify(account_id, celebration).await;
        }

        self.sync.mark_dirty(account_id);
        Ok(CompletionResult {
            celebrations,
            completion_message,
            applied: true,
        })
    }

    /// Roll back the latest completion if its window is still open.
    /// Returns whether a rollback happened.
    pub async fn undo(&self, account_id: Uuid) -> Result<bool, DomainError> {
        let snapshot = match self.undo.lock().await.remove(&account_id) {
            Some(snapshot) => snapshot,
            None => return Ok(false),
        };
        if !snapshot.is_valid(Utc::now()) {
            return Ok(false);
        }

        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        session.player = snapshot.player;
        session.daily = snapshot.daily;
        session.history = snapshot.history;
        self.sync.mark_dirty(account_id);
        Ok(true)
    }

    /// Replace one available or bonus slot with a fresh quest (premium)
    pub async fn refresh_single(
        &self,
        account_id: Uuid,
        quest_id: Uuid,
    ) -> Result<DailyQuests, DomainError> {
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;

        if !session.player.premium {
            return Err(DomainError::Validation(
                "single-slot refresh is a premium feature".to_string(),
            ));
        }
        if session.daily.quest_refreshes_used >= MAX_SINGLE_REFRESHES_PER_DAY {
            return Err(DomainError::QuotaExceeded(format!(
                "refresh quota reached ({}/{})",
                session.daily.quest_refreshes_used, MAX_SINGLE_REFRESHES_PER_DAY
            )));
        }
        let replaced = session
            .daily
            .find(quest_id)
            .ok_or_else(|| DomainError::not_found("Quest", quest_id))?;
        if !replaced.status.is_replaceable() {
            return Err(DomainError::Conflict(format!(
                "quest is {} and cannot be refreshed",
                replaced.status
            )));
        }

        // Avoid regenerating anything currently on screen, including the
        // quest being replaced. No pinned injection on a single slot.
        let mut request = batch_request(&session.player, &session.history);
        request.count = 1;
        request.pinned_titles.clear();
        request
            .recent_titles
            .extend(session.daily.quests.iter().map(|q| q.title.clone()));

        let generated = self.generator.generate_quest_batch(&request).await?;
        let replacement = generated
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::ExternalService("generator returned an empty batch".to_string()))?
            .into_quest(QuestStatus::Available);

        session.daily.consume_refresh(MAX_SINGLE_REFRESHES_PER_DAY)?;
        session.daily.replace_slot(quest_id, replacement)?;
        self.sync.mark_dirty(account_id);
        Ok(session.daily.clone())
    }

    /// Regenerate the whole batch (free accounts' legacy refresh)
    pub async fn refresh_all(&self, account_id: Uuid) -> Result<DailyQuests, DomainError> {
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;

        if session.daily.quest_refreshes_used >= MAX_BATCH_REFRESHES_PER_DAY {
            return Err(DomainError::QuotaExceeded(format!(
                "refresh quota reached ({}/{})",
                session.daily.quest_refreshes_used, MAX_BATCH_REFRESHES_PER_DAY
            )));
        }

        let mut request = batch_request(&session.player, &session.history);
        request
            .recent_titles
            .extend(session.daily.quests.iter().map(|q| q.title.clone()));

        let generated = self.generator.generate_quest_batch(&request).await?;
        session.daily.consume_refresh(MAX_BATCH_REFRESHES_PER_DAY)?;
        session.daily.fill(
            generated
                .into_iter()
                .map(|g| g.into_quest(QuestStatus::Available))
                .collect(),
        );
        self.sync.mark_dirty(account_id);
        Ok(session.daily.clone())
    }

    /// Add a user-written quest to today's batch
    pub async fn add_custom(
        &self,
        account_id: Uuid,
        title: String,
        category: Option<Category>,
    ) -> Result<DailyQuests, DomainError> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::Validation("quest title is empty".to_string()));
        }

        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;
        session
            .daily
            .add_custom(title, category.unwrap_or(Category::Projects));
        self.sync.mark_dirty(account_id);
        Ok(session.daily.clone())
    }

    /// Thumbs up or down on a quest, mirrored onto its history entry
    pub async fn set_feedback(
        &self,
        account_id: Uuid,
        quest_id: Uuid,
        feedback: Feedback,
    ) -> Result<(), DomainError> {
        let session = self.sessions.session(account_id).await;
        let mut session = session.lock().await;

        let title = {
            let quest = session
                .daily
                .find_mut(quest_id)
                .ok_or_else(|| DomainError::not_found("Quest", quest_id))?;
            quest.feedback = Some(feedback);
            quest.title.clone()
        };
        if let Some(entry) = session
            .history
            .iter_mut()
            .rev()
            .find(|e| e.title == title)
        {
            entry.feedback = Some(feedback);
        }
        self.sync.mark_dirty(account_id);
        Ok(())
    }

    /// Full completion history, newest first
    pub async fn history(&self, account_id: Uuid) -> Result<Vec<QuestHistoryEntry>, DomainError> {
        let session = self.sessions.session(account_id).await;
        let session = session.lock().await;
        let mut entries = session.history.clone();
        entries.reverse();
        Ok(entries)
    }

    /// One motivating sentence: LLM for premium (omitted on failure),
    /// a pick from the generic pool otherwise.
    async fn completion_message(
        &self,
        player: &kaizen::Player,
        quest_title: &str,
    ) -> Option<String> {
        if player.premium {
            match self.generator.generate_completion_message(quest_title).await {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!("completion message generation failed: {}", e);
                    None
                }
            }
        } else {
            GENERIC_COMPLETION_MESSAGES
                .choose(&mut rand::thread_rng())
                .map(|m| m.to_string())
        }
    }
}

/// Prompt context for a standard batch
fn batch_request(player: &kaizen::Player, history: &[QuestHistoryEntry]) -> QuestBatchRequest {
    QuestBatchRequest {
        recent_titles: history
            .iter()
            .rev()
            .take(AVOID_LIST_LEN)
            .map(|e| e.title.clone())
            .collect(),
        goals: player.active_goals().map(GoalContext::from_goal).collect(),
        count: player.quest_count(),
        pinned_titles: player.pinned_quests.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        InMemoryStore, RecordingNotifier, ScriptedGenerator, StoreDailyRepo, StoreHistoryRepo,
        StorePlayerRepo,
    };
    use crate::application::PlayerService;
    use std::sync::atomic::Ordering;

    struct Harness {
        store: Arc<InMemoryStore>,
        sessions: Arc<SessionManager>,
        generator: Arc<ScriptedGenerator>,
        notifier: Arc<RecordingNotifier>,
        players: PlayerService<ScriptedGenerator>,
        quests: QuestService<ScriptedGenerator>,
    }

    fn harness() -> Harness {
        let store = Arc::new(InMemoryStore::default());
        let sessions = Arc::new(SessionManager::new(
            Arc::new(StorePlayerRepo(Arc::clone(&store))),
            Arc::new(StoreDailyRepo(Arc::clone(&store))),
            Arc::new(StoreHistoryRepo(Arc::clone(&store))),
        ));
        let generator = Arc::new(ScriptedGenerator::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let sync = SyncWriter::spawn(Arc::clone(&sessions));
        let players = PlayerService::new(
            Arc::clone(&sessions),
            Arc::clone(&generator),
            sync.clone(),
        );
        let quests = QuestService::new(
            Arc::clone(&sessions),
            Arc::clone(&generator),
            notifier.clone() as Arc<dyn Notifier>,
            sync,
        );
        Harness {
            store,
            sessions,
            generator,
            notifier,
            players,
            quests,
        }
    }

    #[tokio::test]
    async fn test_onboard_generate_select_complete_undo_round_trip() {
        let h = harness();
        let account = Uuid::new_v4();

        let player = h
            .players
            .complete_onboarding(account, "Sport".to_string(), None)
            .await
            .unwrap();
        assert!(player.onboarding_complete);
        assert_eq!(player.goals.len(), 1);
        assert_eq!(player.goals[0].themes.len(), 2);

        let daily = h.quests.generate(account).await.unwrap();
        assert_eq!(daily.quests.len(), 3);

        let picked = daily.quests[0].id;
        let daily = h.quests.select(account, picked).await.unwrap();
        assert_eq!(daily.selected_quest_id, Some(picked));

        let result = h.quests.complete(account, picked).await.unwrap();
        assert!(result.applied);
        assert!(!result.celebrations.is_empty());
        assert!(result.completion_message.is_some());

        let restored = h.quests.undo(account).await.unwrap();
        assert!(restored);

        let session = h.sessions.session(account).await;
        let session = session.lock().await;
        assert_eq!(session.player.xp, 0);
        assert_eq!(session.player.quests_completed, 0);
        assert!(session.history.is_empty());
        assert_eq!(session.daily.find(picked).unwrap().status, QuestStatus::Selected);
    }

    #[tokio::test]
    async fn test_undo_without_completion_is_noop() {
        let h = harness();
        assert!(!h.quests.undo(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_completing_available_quest_not_applied() {
        let h = harness();
        let account = Uuid::new_v4();
        h.players
            .complete_onboarding(account, "Sport".to_string(), None)
            .await
            .unwrap();
        let daily = h.quests.generate(account).await.unwrap();

        let result = h.quests.complete(account, daily.quests[0].id).await.unwrap();
        assert!(!result.applied);
        assert!(result.celebrations.is_empty());
        assert!(h.notifier.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_batch_untouched() {
        let h = harness();
        let account = Uuid::new_v4();
        h.players
            .complete_onboarding(account, "Sport".to_string(), None)
            .await
            .unwrap();
        let before = h.quests.generate(account).await.unwrap();

        h.generator.fail_batches.store(true, Ordering::SeqCst);
        assert!(matches!(
            h.quests.generate(account).await,
            Err(DomainError::ExternalService(_))
        ));

        let after = h.quests.today(account).await.unwrap();
        let ids: Vec<Uuid> = after.quests.iter().map(|q| q.id).collect();
        assert_eq!(ids, before.quests.iter().map(|q| q.id).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_single_refresh_premium_gate_and_quota() {
        let h = harness();
        let account = Uuid::new_v4();
        h.players
            .complete_onboarding(account, "Sport".to_string(), None)
            .await
            .unwrap();
        h.quests.generate(account).await.unwrap();

        let daily = h.quests.today(account).await.unwrap();
        let slot = daily.quests[0].id;
        assert!(matches!(
            h.quests.refresh_single(account, slot).await,
            Err(DomainError::Validation(_))
        ));

        h.players.toggle_premium(account).await.unwrap();
        let mut slot = slot;
        for _ in 0..3 {
            let daily = h.quests.refresh_single(account, slot).await.unwrap();
            // Track a still-replaceable slot for the next round.
            slot = daily.quests[0].id;
        }
        assert!(matches!(
            h.quests.refresh_single(account, slot).await,
            Err(DomainError::QuotaExceeded(_))
        ));
    }

    #[tokio::test]
    async fn test_batch_refresh_quota() {
        let h = harness();
        let account = Uuid::new_v4();
        h.players
            .complete_onboarding(account, "Sport".to_string(), None)
            .await
            .unwrap();
        h.quests.generate(account).await.unwrap();

        h.quests.refresh_all(account).await.unwrap();
        h.quests.refresh_all(account).await.unwrap();
        assert!(matches!(
            h.quests.refresh_all(account).await,
            Err(DomainError::QuotaExceeded(_))
        ));
    }

    #[tokio::test]
    async fn test_completed_slot_never_refreshed() {
        let h = harness();
        let account = Uuid::new_v4();
        h.players
            .complete_onboarding(account, "Sport".to_string(), None)
            .await
            .unwrap();
        h.players.toggle_premium(account).await.unwrap();
        let daily = h.quests.generate(account).await.unwrap();

        let picked = daily.quests[0].id;
        h.quests.select(account, picked).await.unwrap();
        h.quests.complete(account, picked).await.unwrap();

        assert!(matches!(
            h.quests.refresh_single(account, picked).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_level_up_story_failure_degrades() {
        let h = harness();
        let account = Uuid::new_v4();
        h.players
            .complete_onboarding(account, "Sport".to_string(), None)
            .await
            .unwrap();
        let daily = h.quests.generate(account).await.unwrap();
        let picked = daily.quests[0].id;
        h.quests.select(account, picked).await.unwrap();

        {
            let session = h.sessions.session(account).await;
            let mut session = session.lock().await;
            session.player.xp = 95;
        }
        h.generator.fail_stories.store(true, Ordering::SeqCst);

        let result = h.quests.complete(account, picked).await.unwrap();
        assert!(result.applied);
        let level_up = result
            .celebrations
            .iter()
            .find(|c| matches!(c, Celebration::LevelUp { .. }))
            .unwrap();
        match level_up {
            Celebration::LevelUp { story, .. } => assert!(story.is_none()),
            _ => unreachable!(),
        }
        assert_eq!(level_up.suggested_duration_ms(), 4_000);

        let session = h.sessions.session(account).await;
        let session = session.lock().await;
        assert_eq!(session.player.level, 2);
        assert!(session.player.story_chapters.is_empty());
    }

    #[tokio::test]
    async fn test_custom_quest_and_feedback_mirrored() {
        let h = harness();
        let account = Uuid::new_v4();
        h.players
            .complete_onboarding(account, "Sport".to_string(), None)
            .await
            .unwrap();
        h.quests.generate(account).await.unwrap();

        let daily = h
            .quests
            .add_custom(account, "Ranger le bureau".to_string(), None)
            .await
            .unwrap();
        let custom = daily.quests.last().unwrap();
        assert_eq!(custom.category, Category::Projects);

        let custom_id = custom.id;
        h.quests.select(account, custom_id).await.unwrap();
        h.quests.complete(account, custom_id).await.unwrap();
        h.quests
            .set_feedback(account, custom_id, Feedback::Down)
            .await
            .unwrap();

        let history = h.quests.history(account).await.unwrap();
        assert_eq!(history[0].feedback, Some(Feedback::Down));
    }

    #[tokio::test]
    async fn test_mutations_eventually_persist() {
        let h = harness();
        let account = Uuid::new_v4();
        h.players
            .complete_onboarding(account, "Sport".to_string(), None)
            .await
            .unwrap();
        h.quests.generate(account).await.unwrap();

        // Debounce (1s) plus a flusher tick.
        tokio::time::sleep(std::time::Duration::from_millis(1600)).await;
        let stored = h.store.players.lock().unwrap().get(&account).cloned();
        assert!(stored.is_some_and(|p| p.onboarding_complete));
    }
}

/// Prompt context for a level-up chapter
fn story_request(
    player: &kaizen::Player,
    history: &[QuestHistoryEntry],
    level: u32,
) -> StoryRequest {
    StoryRequest {
        level,
        title_name: player.title().name.to_string(),
        goals_summary: player
            .active_goals()
            .map(|g| g.label.clone())
            .collect::<Vec<_>>()
            .join(", "),
        recent_quest_titles: history
            .iter()
            .rev()
            .take(STORY_RECENT_QUESTS)
            .map(|e| e.title.clone())
            .collect(),
        previous_chapters: player
            .story_chapters
            .iter()
            .rev()
            .take(STORY_PREVIOUS_CHAPTERS)
            .map(ChapterSummary::from_chapter)
            .collect(),
    }
}
