//! Notifier Port
//!
//! Celebration events the engine emits toward the UI layer. Each event
//! carries enough data to render a transient celebration plus a suggested
//! display duration.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::catalog::BadgeDef;
use crate::domain::progression::{CompletionOutcome, LevelUp};

/// A discrete celebration to surface to the user
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Celebration {
    QuestCompleted {
        quest_title: String,
        xp_gained: u32,
        was_bonus: bool,
    },
    BadgeEarned {
        badge_id: String,
        name: String,
        emoji: String,
        description: String,
    },
    LevelUp {
        level: u32,
        title_name: String,
        title_emoji: String,
        title_changed: bool,
        story: Option<String>,
    },
    PerfectDay,
}

impl Celebration {
    pub fn badge(def: &BadgeDef) -> Self {
        Celebration::BadgeEarned {
            badge_id: def.id.to_string(),
            name: def.name.to_string(),
            emoji: def.emoji.to_string(),
            description: def.description.to_string(),
        }
    }

    pub fn level_up(level_up: &LevelUp, story: Option<String>) -> Self {
        Celebration::LevelUp {
            level: level_up.level,
            title_name: level_up.title.name.to_string(),
            title_emoji: level_up.title.emoji.to_string(),
            title_changed: level_up.title_changed,
            story,
        }
    }

    /// Milliseconds the UI should keep the celebration on screen. A
    /// level-up without its story gets the shortened duration.
    pub fn suggested_duration_ms(&self) -> u32 {
        match self {
            Celebration::QuestCompleted { .. } => 2_000,
            Celebration::BadgeEarned { .. } => 4_000,
            Celebration::LevelUp { story: Some(_), .. } => 6_000,
            Celebration::LevelUp { story: None, .. } => 4_000,
            Celebration::PerfectDay => 5_000,
        }
    }
}

/// Build the full celebration list for a completion, in display order:
/// the quest itself, badges in catalog order, level-up, perfect day.
pub fn celebrations_for(outcome: &CompletionOutcome, story: Option<String>) -> Vec<Celebration> {
    let mut events = vec![Celebration::QuestCompleted {
        quest_title: outcome.quest_title.clone(),
        xp_gained: outcome.xp_gained,
        was_bonus: outcome.was_bonus,
    }];
    for badge in &outcome.new_badges {
        events.push(Celebration::badge(badge));
    }
    if let Some(level_up) = &outcome.leveled_up {
        events.push(Celebration::level_up(level_up, story));
    }
    if outcome.perfect_day {
        events.push(Celebration::PerfectDay);
    }
    events
}

/// Output port for celebration delivery (UI-facing)
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, account_id: Uuid, celebration: &Celebration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_up_duration_shortened_without_story() {
        let with_story = Celebration::LevelUp {
            level: 2,
            title_name: "Aventurier".to_string(),
            title_emoji: "\u{1f331}".to_string(),
            title_changed: false,
            story: Some("...".to_string()),
        };
        let without_story = Celebration::LevelUp {
            level: 2,
            title_name: "Aventurier".to_string(),
            title_emoji: "\u{1f331}".to_string(),
            title_changed: false,
            story: None,
        };
        assert_eq!(with_story.suggested_duration_ms(), 6_000);
        assert_eq!(without_story.suggested_duration_ms(), 4_000);
    }
}
