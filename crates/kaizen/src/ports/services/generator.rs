//! Quest Generator Port
//!
//! Abstract interface for the external text-generation collaborator.
//! The engine only shapes the request context and validates the returned
//! structure; prompt wording and transport live in the adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Goal, Quest, StoryChapter, Theme};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{Category, DevelopmentLevel, Difficulty, QuestStatus};

/// Per-theme development state handed to generation for difficulty bias
#[derive(Debug, Clone, Serialize)]
pub struct ThemeContext {
    pub theme_id: String,
    pub name: String,
    pub quests_completed: u32,
    pub development_level: DevelopmentLevel,
    pub suggested_difficulty: Difficulty,
}

/// One active goal's generation context
#[derive(Debug, Clone, Serialize)]
pub struct GoalContext {
    pub goal_id: Uuid,
    pub label: String,
    pub context: Option<String>,
    pub themes: Vec<ThemeContext>,
}

impl GoalContext {
    pub fn from_goal(goal: &Goal) -> Self {
        Self {
            goal_id: goal.id,
            label: goal.label.clone(),
            context: goal.context.clone(),
            themes: goal
                .themes
                .iter()
                .map(|t| ThemeContext {
                    theme_id: t.id.clone(),
                    name: t.name.clone(),
                    quests_completed: t.quests_completed,
                    development_level: t.development_level,
                    suggested_difficulty: t.development_level.suggested_difficulty(),
                })
                .collect(),
        }
    }
}

/// Request for a batch of daily quests
#[derive(Debug, Clone, Default)]
pub struct QuestBatchRequest {
    /// Recent titles the generator must avoid repeating
    pub recent_titles: Vec<String>,
    /// Active (non-archived) goals; empty means a deliberately
    /// difficulty-mixed general batch
    pub goals: Vec<GoalContext>,
    /// Number of quests wanted beyond the pinned ones
    pub count: usize,
    /// Titles to always include in addition to the generated quota
    pub pinned_titles: Vec<String>,
}

/// One generated quest before it gets a local identity and status
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuest {
    pub title: String,
    pub category: Category,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub goal_id: Option<Uuid>,
    #[serde(default)]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
}

impl GeneratedQuest {
    /// Assign a local identity and initial status
    pub fn into_quest(self, status: QuestStatus) -> Quest {
        let mut quest = Quest::new(self.title, self.category, self.difficulty);
        quest.description = self.description;
        quest.estimated_time = self.estimated_time;
        quest.goal_id = self.goal_id;
        quest.theme_id = self.theme_id;
        quest.is_pinned = self.is_pinned;
        quest.status = status;
        quest
    }
}

/// One generated theme for a new goal
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedTheme {
    pub id: String,
    pub name: String,
}

impl GeneratedTheme {
    pub fn into_theme(self) -> Theme {
        Theme::new(self.id, self.name)
    }
}

/// Context for the level-up narrative
#[derive(Debug, Clone, Default)]
pub struct StoryRequest {
    pub level: u32,
    pub title_name: String,
    pub goals_summary: String,
    pub recent_quest_titles: Vec<String>,
    pub previous_chapters: Vec<ChapterSummary>,
}

/// Shortened previous chapter fed back for continuity
#[derive(Debug, Clone)]
pub struct ChapterSummary {
    pub level: u32,
    pub excerpt: String,
}

impl ChapterSummary {
    /// First 80 characters of the chapter, the way the prompt wants it
    pub fn from_chapter(chapter: &StoryChapter) -> Self {
        Self {
            level: chapter.level,
            excerpt: chapter.story.chars().take(80).collect(),
        }
    }
}

/// External text-generation collaborator.
///
/// Every call may fail with `ExternalService`; callers abort the
/// dependent operation without committing partial state, except the
/// narrative which degrades gracefully.
#[async_trait]
pub trait QuestGenerator: Send + Sync {
    /// Generate `request.count` quests plus one per pinned title
    async fn generate_quest_batch(
        &self,
        request: &QuestBatchRequest,
    ) -> Result<Vec<GeneratedQuest>, DomainError>;

    /// Break a goal label down into 2-10 themes
    async fn generate_themes_for_goal(
        &self,
        label: &str,
        context: Option<&str>,
    ) -> Result<Vec<GeneratedTheme>, DomainError>;

    /// Short narrative chapter for a level-up
    async fn generate_level_up_story(&self, request: &StoryRequest)
        -> Result<String, DomainError>;

    /// One motivating sentence for a completed quest
    async fn generate_completion_message(&self, quest_title: &str) -> Result<String, DomainError>;
}
