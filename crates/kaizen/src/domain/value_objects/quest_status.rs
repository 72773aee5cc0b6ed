//! QuestStatus - Lifecycle state of a quest within a daily batch
//!
//! Transitions:
//! - `available` -> `selected` (user picks the quest of the day; the other
//!   available quests become `bonus` at the same time)
//! - `selected` | `bonus` -> `completed` (terminal)
//!
//! An `available` quest can never be completed directly.

use serde::{Deserialize, Serialize};

/// Quest lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    #[default]
    Available,
    Selected,
    Bonus,
    Completed,
}

impl QuestStatus {
    /// Whether a quest in this state may transition to `completed`
    pub fn is_completable(&self) -> bool {
        matches!(self, QuestStatus::Selected | QuestStatus::Bonus)
    }

    /// Whether a single-slot refresh may replace a quest in this state
    pub fn is_replaceable(&self) -> bool {
        matches!(self, QuestStatus::Available | QuestStatus::Bonus)
    }
}

impl std::fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestStatus::Available => write!(f, "available"),
            QuestStatus::Selected => write!(f, "selected"),
            QuestStatus::Bonus => write!(f, "bonus"),
            QuestStatus::Completed => write!(f, "completed"),
        }
    }
}
