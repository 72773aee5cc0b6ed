//! Progression - The pure completion transition
//!
//! Everything that happens when a quest is completed, expressed as one
//! synchronous transformation over the `{player, daily, history}` triple.
//! Callers clone the triple beforehand when they need an undo snapshot;
//! no partial state is ever observable.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::catalog::{BadgeDef, Title, BONUS_QUEST_MULTIPLIER, UNDO_WINDOW_SECS};
use crate::domain::entities::{compute_streak, DailyQuests, Player, QuestHistoryEntry};
use crate::domain::value_objects::{Difficulty, QuestStatus};

/// Level-up details for the celebration layer
#[derive(Debug, Clone, Copy)]
pub struct LevelUp {
    pub level: u32,
    pub title: Title,
    pub title_changed: bool,
}

/// Everything the caller needs to celebrate and persist a completion
#[derive(Debug)]
pub struct CompletionOutcome {
    pub quest_id: Uuid,
    pub quest_title: String,
    pub xp_gained: u32,
    pub was_bonus: bool,
    pub leveled_up: Option<LevelUp>,
    pub new_badges: Vec<&'static BadgeDef>,
    pub perfect_day: bool,
}

/// Snapshot of the full triple taken just before a completion.
///
/// Capacity-1 buffer semantics: a newer completion replaces it, and it
/// expires after a fixed window.
#[derive(Debug, Clone)]
pub struct UndoSnapshot {
    pub player: Player,
    pub daily: DailyQuests,
    pub history: Vec<QuestHistoryEntry>,
    pub quest_id: Uuid,
    pub taken_at: DateTime<Utc>,
}

impl UndoSnapshot {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        (now - self.taken_at).num_seconds() < UNDO_WINDOW_SECS
    }
}

/// XP for a completion: base from the difficulty table, scaled for bonus
/// quests and floored.
pub fn completion_xp(difficulty: Difficulty, was_bonus: bool) -> u32 {
    let base = difficulty.base_xp();
    if was_bonus {
        (base as f64 * BONUS_QUEST_MULTIPLIER).floor() as u32
    } else {
        base
    }
}

/// Apply a quest completion to the triple in place.
///
/// Returns `None` (leaving all state untouched) when the quest does not
/// exist, is still `available`, or is already completed - invalid local
/// state is a no-op, never an error.
pub fn apply_completion(
    player: &mut Player,
    daily: &mut DailyQuests,
    history: &mut Vec<QuestHistoryEntry>,
    quest_id: Uuid,
    now: DateTime<Utc>,
) -> Option<CompletionOutcome> {
    let quest = daily.find(quest_id)?;
    if !quest.status.is_completable() {
        return None;
    }

    let was_bonus = quest.status == QuestStatus::Bonus;
    let difficulty = quest.difficulty;
    let quest_title = quest.title.clone();
    let goal_id = quest.goal_id;
    let theme_id = quest.theme_id.clone();
    let previous_title = player.title();

    let xp_gained = completion_xp(difficulty, was_bonus);
    let award = player.award_xp(xp_gained);

    // Theme development for linked quests
    if let (Some(goal_id), Some(theme_id)) = (goal_id, theme_id.as_deref()) {
        if let Some(theme) = player
            .goal_mut(goal_id)
            .and_then(|g| g.theme_mut(theme_id))
        {
            theme.record_completion(now);
        }
    }

    // Terminal transition, flags frozen at this moment
    if let Some(q) = daily.find_mut(quest_id) {
        q.status = QuestStatus::Completed;
        q.completed_at = Some(now);
        q.was_bonus = was_bonus;
    }

    // Perfect day can only become true on the completion that finishes
    // the batch, so the counter moves at most once per calendar day.
    let perfect_day = daily.all_completed();
    if perfect_day {
        player.perfect_days += 1;
    }

    history.push(QuestHistoryEntry {
        title: quest_title.clone(),
        date: now,
        goal_id,
        theme_id,
        was_perfect_day: perfect_day,
        category: daily.find(quest_id).map(|q| q.category),
        difficulty: Some(difficulty),
        feedback: None,
    });

    player.quests_completed += 1;
    if difficulty == Difficulty::Hard {
        player.hard_quests_completed += 1;
    }
    if was_bonus {
        player.bonus_quests_completed += 1;
    }

    player.current_streak =
        compute_streak(history, &player.streak_freeze_days, now.date_naive());
    player.best_streak = player.best_streak.max(player.current_streak);

    // Badges last, once every counter has settled
    let new_badges = player.evaluate_badges();

    let leveled_up = award.leveled_up.then(|| {
        let title = player.title();
        LevelUp {
            level: player.level,
            title,
            title_changed: title.name != previous_title.name,
        }
    });

    Some(CompletionOutcome {
        quest_id,
        quest_title,
        xp_gained,
        was_bonus,
        leveled_up,
        new_badges,
        perfect_day,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Quest;
    use crate::domain::value_objects::Category;

    fn triple(n: usize) -> (Player, DailyQuests, Vec<QuestHistoryEntry>) {
        let mut player = Player::new();
        player.onboarding_complete = true;
        let mut daily = DailyQuests::empty_for(Utc::now().date_naive());
        daily.fill(
            (0..n)
                .map(|i| Quest::new(format!("Quest {}", i), Category::Body, Difficulty::Easy))
                .collect(),
        );
        (player, daily, Vec::new())
    }

    #[test]
    fn test_completing_available_quest_is_noop() {
        let (mut player, mut daily, mut history) = triple(3);
        let id = daily.quests[0].id;
        let before = player.clone();

        assert!(apply_completion(&mut player, &mut daily, &mut history, id, Utc::now()).is_none());
        assert_eq!(player.xp, before.xp);
        assert_eq!(daily.quests[0].status, QuestStatus::Available);
        assert!(history.is_empty());
    }

    #[test]
    fn test_completing_unknown_quest_is_noop() {
        let (mut player, mut daily, mut history) = triple(3);
        assert!(apply_completion(
            &mut player,
            &mut daily,
            &mut history,
            Uuid::new_v4(),
            Utc::now()
        )
        .is_none());
    }

    #[test]
    fn test_selected_easy_quest_awards_base_xp() {
        let (mut player, mut daily, mut history) = triple(3);
        let id = daily.quests[0].id;
        daily.select(id).unwrap();

        let outcome =
            apply_completion(&mut player, &mut daily, &mut history, id, Utc::now()).unwrap();
        assert_eq!(outcome.xp_gained, 10);
        assert!(!outcome.was_bonus);
        assert_eq!(player.xp, 10);
        assert_eq!(player.quests_completed, 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_bonus_medium_quest_awards_scaled_xp() {
        // Batch of 3, select A, complete B (bonus, medium) -> floor(25 * 1.5) = 37
        let (mut player, mut daily, mut history) = triple(3);
        daily.quests[1].difficulty = Difficulty::Medium;
        let a = daily.quests[0].id;
        let b = daily.quests[1].id;
        daily.select(a).unwrap();

        let outcome =
            apply_completion(&mut player, &mut daily, &mut history, b, Utc::now()).unwrap();
        assert_eq!(outcome.xp_gained, 37);
        assert!(outcome.was_bonus);
        assert_eq!(player.bonus_quests_completed, 1);
    }

    #[test]
    fn test_level_up_at_threshold() {
        // xp=90, xpToNext=100, +10 easy selected -> level 2, xp 0, next 120
        let (mut player, mut daily, mut history) = triple(3);
        player.xp = 90;
        let id = daily.quests[0].id;
        daily.select(id).unwrap();

        let outcome =
            apply_completion(&mut player, &mut daily, &mut history, id, Utc::now()).unwrap();
        let level_up = outcome.leveled_up.unwrap();
        assert_eq!(level_up.level, 2);
        assert!(!level_up.title_changed);
        assert_eq!(player.xp, 0);
        assert_eq!(player.xp_to_next, 120);
    }

    #[test]
    fn test_double_completion_is_noop() {
        let (mut player, mut daily, mut history) = triple(2);
        let id = daily.quests[0].id;
        daily.select(id).unwrap();
        apply_completion(&mut player, &mut daily, &mut history, id, Utc::now()).unwrap();

        assert!(apply_completion(&mut player, &mut daily, &mut history, id, Utc::now()).is_none());
        assert_eq!(player.quests_completed, 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_perfect_day_fires_once_on_last_completion() {
        let (mut player, mut daily, mut history) = triple(2);
        let a = daily.quests[0].id;
        let b = daily.quests[1].id;
        daily.select(a).unwrap();

        let first =
            apply_completion(&mut player, &mut daily, &mut history, a, Utc::now()).unwrap();
        assert!(!first.perfect_day);
        assert_eq!(player.perfect_days, 0);

        let second =
            apply_completion(&mut player, &mut daily, &mut history, b, Utc::now()).unwrap();
        assert!(second.perfect_day);
        assert_eq!(player.perfect_days, 1);
        assert!(history[1].was_perfect_day);
    }

    #[test]
    fn test_counters_never_decrease() {
        let (mut player, mut daily, mut history) = triple(3);
        daily.quests[2].difficulty = Difficulty::Hard;
        let ids: Vec<Uuid> = daily.quests.iter().map(|q| q.id).collect();
        daily.select(ids[0]).unwrap();

        let mut last = (0, 0, 0, 0);
        for id in ids {
            apply_completion(&mut player, &mut daily, &mut history, id, Utc::now()).unwrap();
            let now = (
                player.quests_completed,
                player.hard_quests_completed,
                player.best_streak,
                player.badges.len() as u32,
            );
            assert!(now.0 >= last.0 && now.1 >= last.1 && now.2 >= last.2 && now.3 >= last.3);
            last = now;
        }
        assert_eq!(player.hard_quests_completed, 1);
    }

    #[test]
    fn test_first_quest_badge_earned() {
        let (mut player, mut daily, mut history) = triple(3);
        let id = daily.quests[0].id;
        daily.select(id).unwrap();

        let outcome =
            apply_completion(&mut player, &mut daily, &mut history, id, Utc::now()).unwrap();
        assert_eq!(outcome.new_badges.len(), 1);
        assert_eq!(outcome.new_badges[0].id, "first-quest");
        assert_eq!(player.badges, vec!["first-quest".to_string()]);
    }

    #[test]
    fn test_theme_progression_on_linked_quest() {
        use crate::domain::entities::{Goal, Theme};
        use crate::domain::value_objects::DevelopmentLevel;

        let (mut player, mut daily, mut history) = triple(2);
        let goal = Goal::new(
            "Sport".to_string(),
            None,
            vec![Theme::new("cardio".to_string(), "Cardio".to_string())],
        );
        let goal_id = goal.id;
        player.goals.push(goal);
        daily.quests[0].goal_id = Some(goal_id);
        daily.quests[0].theme_id = Some("cardio".to_string());

        let id = daily.quests[0].id;
        daily.select(id).unwrap();
        apply_completion(&mut player, &mut daily, &mut history, id, Utc::now()).unwrap();

        let theme = &player.goals[0].themes[0];
        assert_eq!(theme.quests_completed, 1);
        assert_eq!(theme.development_level, DevelopmentLevel::Low);
    }

    #[test]
    fn test_undo_snapshot_window() {
        let (player, daily, history) = triple(1);
        let snapshot = UndoSnapshot {
            player,
            daily,
            history,
            quest_id: Uuid::new_v4(),
            taken_at: Utc::now(),
        };
        assert!(snapshot.is_valid(snapshot.taken_at + chrono::Duration::seconds(5)));
        assert!(!snapshot.is_valid(snapshot.taken_at + chrono::Duration::seconds(6)));
    }

    #[test]
    fn test_streak_counts_today_after_completion() {
        let (mut player, mut daily, mut history) = triple(2);
        let id = daily.quests[0].id;
        daily.select(id).unwrap();
        apply_completion(&mut player, &mut daily, &mut history, id, Utc::now()).unwrap();
        assert_eq!(player.current_streak, 1);
        assert_eq!(player.best_streak, 1);
    }
}
