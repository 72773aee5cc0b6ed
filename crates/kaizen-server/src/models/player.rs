//! Player-facing DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use kaizen::catalog::PresetGoal;
use kaizen::{Goal, Player, StoryChapter, Theme};

/// Full player profile
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerResponse {
    pub name: String,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub title_name: String,
    pub title_emoji: String,
    pub badges: Vec<String>,
    pub quests_completed: u32,
    pub hard_quests_completed: u32,
    pub bonus_quests_completed: u32,
    pub perfect_days: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub premium: bool,
    pub needs_onboarding: bool,
    pub pinned_quests: Vec<String>,
    pub goals: Vec<GoalResponse>,
    pub story_chapters: Vec<StoryChapterResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GoalResponse {
    pub id: Uuid,
    pub label: String,
    pub context: Option<String>,
    pub archived: bool,
    pub themes: Vec<ThemeResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeResponse {
    pub id: String,
    pub name: String,
    pub quests_completed: u32,
    pub development_level: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoryChapterResponse {
    pub level: u32,
    pub title: String,
    pub story: String,
    pub date: DateTime<Utc>,
}

/// Onboarding request: a preset goal id or free text, plus optional
/// personal context
#[derive(Debug, Deserialize, ToSchema)]
pub struct OnboardingRequest {
    pub goal: String,
    pub context: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddGoalRequest {
    pub label: String,
    pub context: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TogglePinRequest {
    pub title: String,
}

/// New state of a toggled flag
#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleResponse {
    pub enabled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PresetGoalResponse {
    pub id: String,
    pub label: String,
    pub emoji: String,
}

impl From<&PresetGoal> for PresetGoalResponse {
    fn from(preset: &PresetGoal) -> Self {
        Self {
            id: preset.id.to_string(),
            label: preset.label.to_string(),
            emoji: preset.emoji.to_string(),
        }
    }
}

impl From<&Theme> for ThemeResponse {
    fn from(theme: &Theme) -> Self {
        Self {
            id: theme.id.clone(),
            name: theme.name.clone(),
            quests_completed: theme.quests_completed,
            development_level: theme.development_level.to_string(),
        }
    }
}

impl From<&Goal> for GoalResponse {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id,
            label: goal.label.clone(),
            context: goal.context.clone(),
            archived: goal.is_archived(),
            themes: goal.themes.iter().map(ThemeResponse::from).collect(),
        }
    }
}

impl From<&StoryChapter> for StoryChapterResponse {
    fn from(chapter: &StoryChapter) -> Self {
        Self {
            level: chapter.level,
            title: chapter.title.clone(),
            story: chapter.story.clone(),
            date: chapter.date,
        }
    }
}

impl PlayerResponse {
    pub fn from_player(player: &Player, needs_onboarding: bool) -> Self {
        let title = player.title();
        Self {
            name: player.name.clone(),
            level: player.level,
            xp: player.xp,
            xp_to_next: player.xp_to_next,
            title_name: title.name.to_string(),
            title_emoji: title.emoji.to_string(),
            badges: player.badges.clone(),
            quests_completed: player.quests_completed,
            hard_quests_completed: player.hard_quests_completed,
            bonus_quests_completed: player.bonus_quests_completed,
            perfect_days: player.perfect_days,
            current_streak: player.current_streak,
            best_streak: player.best_streak,
            premium: player.premium,
            needs_onboarding,
            pinned_quests: player.pinned_quests.clone(),
            goals: player.goals.iter().map(GoalResponse::from).collect(),
            story_chapters: player
                .story_chapters
                .iter()
                .map(StoryChapterResponse::from)
                .collect(),
        }
    }
}
