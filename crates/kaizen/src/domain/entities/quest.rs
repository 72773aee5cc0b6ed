//! Quest and DailyQuests - One day's quest batch and its state machine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{Category, Difficulty, Feedback, QuestStatus};

/// A single actionable task offered for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    pub category: Category,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub status: QuestStatus,
    #[serde(default)]
    pub goal_id: Option<Uuid>,
    #[serde(default)]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub was_bonus: bool,
    #[serde(default)]
    pub completion_message: Option<String>,
    #[serde(default)]
    pub feedback: Option<Feedback>,
    #[serde(default)]
    pub is_pinned: bool,
}

impl Quest {
    pub fn new(title: String, category: Category, difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            estimated_time: None,
            category,
            difficulty,
            status: QuestStatus::Available,
            goal_id: None,
            theme_id: None,
            completed_at: None,
            was_bonus: false,
            completion_message: None,
            feedback: None,
            is_pinned: false,
        }
    }
}

/// The container for one calendar day's quests.
///
/// Invariant: at most one quest is `selected`; `selected_quest_id` always
/// points at it. `date` matches "today" in the active view - a mismatch
/// resets the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyQuests {
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub selected_quest_id: Option<Uuid>,
    pub date: NaiveDate,
    #[serde(default)]
    pub quest_refreshes_used: u32,
}

impl DailyQuests {
    /// Empty batch for a given day
    pub fn empty_for(date: NaiveDate) -> Self {
        Self {
            quests: Vec::new(),
            selected_quest_id: None,
            date,
            quest_refreshes_used: 0,
        }
    }

    /// True when the stored date no longer matches today
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.date != today
    }

    /// Discard the batch and zero the refresh counter for a new day
    pub fn reset_for(&mut self, today: NaiveDate) {
        *self = Self::empty_for(today);
    }

    /// Replace the batch content after generation, keeping the date
    pub fn fill(&mut self, quests: Vec<Quest>) {
        self.quests = quests;
        self.selected_quest_id = None;
    }

    pub fn find(&self, quest_id: Uuid) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    pub fn find_mut(&mut self, quest_id: Uuid) -> Option<&mut Quest> {
        self.quests.iter_mut().find(|q| q.id == quest_id)
    }

    pub fn has_selected(&self) -> bool {
        self.selected_quest_id.is_some()
    }

    pub fn completed_count(&self) -> usize {
        self.quests
            .iter()
            .filter(|q| q.status == QuestStatus::Completed)
            .count()
    }

    /// A perfect day: every quest in the batch is completed
    pub fn all_completed(&self) -> bool {
        !self.quests.is_empty() && self.completed_count() == self.quests.len()
    }

    /// Choose the quest of the day. The chosen quest must be `available`;
    /// every other available quest becomes `bonus` in the same step, so
    /// the one-selected invariant holds structurally.
    pub fn select(&mut self, quest_id: Uuid) -> Result<(), DomainError> {
        if self.has_selected() {
            return Err(DomainError::Conflict(
                "a quest is already selected for today".to_string(),
            ));
        }
        let quest = self
            .find(quest_id)
            .ok_or_else(|| DomainError::not_found("Quest", quest_id))?;
        if quest.status != QuestStatus::Available {
            return Err(DomainError::Conflict(format!(
                "quest is {} and cannot be selected",
                quest.status
            )));
        }

        for q in &mut self.quests {
            if q.id == quest_id {
                q.status = QuestStatus::Selected;
            } else if q.status == QuestStatus::Available {
                q.status = QuestStatus::Bonus;
            }
        }
        self.selected_quest_id = Some(quest_id);
        Ok(())
    }

    /// Insert a user-written quest: bonus when a quest of the day already
    /// exists, available otherwise.
    pub fn add_custom(&mut self, title: String, category: Category) -> Uuid {
        let mut quest = Quest::new(title, category, Difficulty::Medium);
        quest.description = Some("Qu\u{ea}te personnalis\u{e9}e".to_string());
        quest.status = if self.has_selected() {
            QuestStatus::Bonus
        } else {
            QuestStatus::Available
        };
        let id = quest.id;
        self.quests.push(quest);
        id
    }

    /// Consume one refresh against a daily cap
    pub fn consume_refresh(&mut self, cap: u32) -> Result<(), DomainError> {
        if self.quest_refreshes_used >= cap {
            return Err(DomainError::QuotaExceeded(format!(
                "refresh quota reached ({}/{})",
                self.quest_refreshes_used, cap
            )));
        }
        self.quest_refreshes_used += 1;
        Ok(())
    }

    /// Swap one slot for a freshly generated quest. The new quest takes
    /// the slot's identity-independent state: it inherits the old status
    /// but gets a fresh id. Selected and completed slots are never
    /// replaceable.
    pub fn replace_slot(&mut self, quest_id: Uuid, mut replacement: Quest) -> Result<(), DomainError> {
        let slot = self
            .find(quest_id)
            .ok_or_else(|| DomainError::not_found("Quest", quest_id))?;
        if !slot.status.is_replaceable() {
            return Err(DomainError::Conflict(format!(
                "quest is {} and cannot be refreshed",
                slot.status
            )));
        }
        replacement.status = slot.status;
        for q in &mut self.quests {
            if q.id == quest_id {
                *q = replacement;
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_of(n: usize) -> DailyQuests {
        let mut daily = DailyQuests::empty_for(Utc::now().date_naive());
        daily.fill(
            (0..n)
                .map(|i| Quest::new(format!("Quest {}", i), Category::Body, Difficulty::Easy))
                .collect(),
        );
        daily
    }

    #[test]
    fn test_select_promotes_others_to_bonus() {
        let mut daily = batch_of(3);
        let picked = daily.quests[0].id;
        daily.select(picked).unwrap();

        assert_eq!(daily.selected_quest_id, Some(picked));
        assert_eq!(daily.quests[0].status, QuestStatus::Selected);
        assert_eq!(daily.quests[1].status, QuestStatus::Bonus);
        assert_eq!(daily.quests[2].status, QuestStatus::Bonus);
    }

    #[test]
    fn test_at_most_one_selected() {
        let mut daily = batch_of(3);
        let a = daily.quests[0].id;
        let b = daily.quests[1].id;
        daily.select(a).unwrap();
        assert!(matches!(daily.select(b), Err(DomainError::Conflict(_))));

        let selected = daily
            .quests
            .iter()
            .filter(|q| q.status == QuestStatus::Selected)
            .count();
        assert_eq!(selected, 1);
    }

    #[test]
    fn test_select_unknown_quest() {
        let mut daily = batch_of(2);
        assert!(matches!(
            daily.select(Uuid::new_v4()),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn test_add_custom_before_and_after_selection() {
        let mut daily = batch_of(2);
        daily.add_custom("Ranger le bureau".to_string(), Category::Environment);
        assert_eq!(daily.quests[2].status, QuestStatus::Available);

        let picked = daily.quests[0].id;
        daily.select(picked).unwrap();
        daily.add_custom("Appeler un ami".to_string(), Category::Social);
        assert_eq!(daily.quests[3].status, QuestStatus::Bonus);
        assert_eq!(daily.quests[3].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_replace_slot_inherits_status() {
        let mut daily = batch_of(3);
        daily.select(daily.quests[0].id).unwrap();

        let bonus_id = daily.quests[1].id;
        let replacement = Quest::new("Nouvelle".to_string(), Category::Mind, Difficulty::Hard);
        let new_id = replacement.id;
        daily.replace_slot(bonus_id, replacement).unwrap();

        assert!(daily.find(bonus_id).is_none());
        let swapped = daily.find(new_id).unwrap();
        assert_eq!(swapped.status, QuestStatus::Bonus);
    }

    #[test]
    fn test_replace_selected_slot_rejected() {
        let mut daily = batch_of(2);
        let picked = daily.quests[0].id;
        daily.select(picked).unwrap();

        let replacement = Quest::new("Nouvelle".to_string(), Category::Mind, Difficulty::Easy);
        assert!(matches!(
            daily.replace_slot(picked, replacement),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn test_refresh_quota() {
        let mut daily = batch_of(3);
        daily.consume_refresh(3).unwrap();
        daily.consume_refresh(3).unwrap();
        daily.consume_refresh(3).unwrap();
        assert!(matches!(
            daily.consume_refresh(3),
            Err(DomainError::QuotaExceeded(_))
        ));
        assert_eq!(daily.quest_refreshes_used, 3);
    }

    #[test]
    fn test_stale_batch_reset() {
        let yesterday = Utc::now().date_naive().pred_opt().unwrap();
        let mut daily = batch_of(3);
        daily.date = yesterday;
        daily.quest_refreshes_used = 2;

        let today = Utc::now().date_naive();
        assert!(daily.is_stale(today));
        daily.reset_for(today);
        assert!(daily.quests.is_empty());
        assert_eq!(daily.quest_refreshes_used, 0);
        assert_eq!(daily.date, today);
    }
}
