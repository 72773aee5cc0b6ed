//! Quest-facing DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use kaizen::{Celebration, DailyQuests, Quest, QuestHistoryEntry};

use crate::application::CompletionResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct QuestResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub estimated_time: Option<String>,
    pub category: String,
    pub difficulty: String,
    pub status: String,
    pub goal_id: Option<Uuid>,
    pub theme_id: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub was_bonus: bool,
    pub completion_message: Option<String>,
    pub feedback: Option<String>,
    pub is_pinned: bool,
}

/// One day's batch
#[derive(Debug, Serialize, ToSchema)]
pub struct DailyQuestsResponse {
    pub quests: Vec<QuestResponse>,
    pub selected_quest_id: Option<Uuid>,
    pub date: NaiveDate,
    pub quest_refreshes_used: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCustomQuestRequest {
    pub title: String,
    /// body | mind | environment | projects | social; defaults to projects
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    /// up | down
    pub feedback: String,
}

/// One celebration to display, flattened for the wire
#[derive(Debug, Serialize, ToSchema)]
pub struct CelebrationResponse {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quest_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp_gained: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub was_bonus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_changed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    pub duration_ms: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompleteResponse {
    /// False when the completion was ignored as invalid local state
    pub applied: bool,
    pub completion_message: Option<String>,
    pub celebrations: Vec<CelebrationResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UndoResponse {
    pub restored: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryEntryResponse {
    pub title: String,
    pub date: DateTime<Utc>,
    pub goal_id: Option<Uuid>,
    pub theme_id: Option<String>,
    pub was_perfect_day: bool,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub feedback: Option<String>,
}

impl From<&Quest> for QuestResponse {
    fn from(quest: &Quest) -> Self {
        Self {
            id: quest.id,
            title: quest.title.clone(),
            description: quest.description.clone(),
            estimated_time: quest.estimated_time.clone(),
            category: quest.category.to_string(),
            difficulty: quest.difficulty.to_string(),
            status: quest.status.to_string(),
            goal_id: quest.goal_id,
            theme_id: quest.theme_id.clone(),
            completed_at: quest.completed_at,
            was_bonus: quest.was_bonus,
            completion_message: quest.completion_message.clone(),
            feedback: quest.feedback.map(|f| f.to_string()),
            is_pinned: quest.is_pinned,
        }
    }
}

impl From<&DailyQuests> for DailyQuestsResponse {
    fn from(daily: &DailyQuests) -> Self {
        Self {
            quests: daily.quests.iter().map(QuestResponse::from).collect(),
            selected_quest_id: daily.selected_quest_id,
            date: daily.date,
            quest_refreshes_used: daily.quest_refreshes_used,
        }
    }
}

impl From<&QuestHistoryEntry> for HistoryEntryResponse {
    fn from(entry: &QuestHistoryEntry) -> Self {
        Self {
            title: entry.title.clone(),
            date: entry.date,
            goal_id: entry.goal_id,
            theme_id: entry.theme_id.clone(),
            was_perfect_day: entry.was_perfect_day,
            category: entry.category.map(|c| c.to_string()),
            difficulty: entry.difficulty.map(|d| d.to_string()),
            feedback: entry.feedback.map(|f| f.to_string()),
        }
    }
}

impl From<&Celebration> for CelebrationResponse {
    fn from(celebration: &Celebration) -> Self {
        let duration_ms = celebration.suggested_duration_ms();
        let mut response = Self {
            kind: String::new(),
            quest_title: None,
            xp_gained: None,
            was_bonus: None,
            badge_id: None,
            name: None,
            emoji: None,
            description: None,
            level: None,
            title_name: None,
            title_emoji: None,
            title_changed: None,
            story: None,
            duration_ms,
        };
        match celebration {
            Celebration::QuestCompleted {
                quest_title,
                xp_gained,
                was_bonus,
            } => {
                response.kind = "quest_completed".to_string();
                response.quest_title = Some(quest_title.clone());
                response.xp_gained = Some(*xp_gained);
                response.was_bonus = Some(*was_bonus);
            }
            Celebration::BadgeEarned {
                badge_id,
                name,
                emoji,
                description,
            } => {
                response.kind = "badge_earned".to_string();
                response.badge_id = Some(badge_id.clone());
                response.name = Some(name.clone());
                response.emoji = Some(emoji.clone());
                response.description = Some(description.clone());
            }
            Celebration::LevelUp {
                level,
                title_name,
                title_emoji,
                title_changed,
                story,
            } => {
                response.kind = "level_up".to_string();
                response.level = Some(*level);
                response.title_name = Some(title_name.clone());
                response.title_emoji = Some(title_emoji.clone());
                response.title_changed = Some(*title_changed);
                response.story = story.clone();
            }
            Celebration::PerfectDay => {
                response.kind = "perfect_day".to_string();
            }
        }
        response
    }
}

impl From<CompletionResult> for CompleteResponse {
    fn from(result: CompletionResult) -> Self {
        Self {
            applied: result.applied,
            completion_message: result.completion_message,
            celebrations: result
                .celebrations
                .iter()
                .map(CelebrationResponse::from)
                .collect(),
        }
    }
}
