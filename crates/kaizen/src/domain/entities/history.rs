//! QuestHistory - Append-only record of completions, and the streak walk

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{Category, Difficulty, Feedback};

/// Immutable record of one completion. Only `feedback` may be attached
/// after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestHistoryEntry {
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub goal_id: Option<Uuid>,
    #[serde(default)]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub was_perfect_day: bool,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub feedback: Option<Feedback>,
}

/// Days scanned before the walk gives up; a year-long streak is the cap
const STREAK_SCAN_DAYS: i64 = 365;

/// Count consecutive active days walking back from today. A day is active
/// when at least one history entry falls on it or it is an explicit
/// freeze day. When today itself has no activity the walk starts from
/// yesterday, so an unfinished day does not break a live streak. Gaps are
/// only ever bridged by freeze-day entries.
pub fn compute_streak(
    history: &[QuestHistoryEntry],
    freeze_days: &[NaiveDate],
    today: NaiveDate,
) -> u32 {
    if history.is_empty() && freeze_days.is_empty() {
        return 0;
    }

    let is_active = |day: NaiveDate| {
        history.iter().any(|e| e.date.date_naive() == day) || freeze_days.contains(&day)
    };

    let start = if is_active(today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0u32;
    for i in 0..STREAK_SCAN_DAYS {
        let day = start - Duration::days(i);
        if is_active(day) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry_on(day: NaiveDate) -> QuestHistoryEntry {
        let date = Utc
            .from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap());
        QuestHistoryEntry {
            title: "Quest".to_string(),
            date,
            goal_id: None,
            theme_id: None,
            was_perfect_day: false,
            category: None,
            difficulty: None,
            feedback: None,
        }
    }

    fn day(offset_from_today: i64) -> NaiveDate {
        Utc::now().date_naive() + Duration::days(offset_from_today)
    }

    #[test]
    fn test_empty_history_no_streak() {
        assert_eq!(compute_streak(&[], &[], Utc::now().date_naive()), 0);
    }

    #[test]
    fn test_three_consecutive_days() {
        let history = vec![entry_on(day(-2)), entry_on(day(-1)), entry_on(day(0))];
        assert_eq!(compute_streak(&history, &[], day(0)), 3);
    }

    #[test]
    fn test_today_inactive_counts_from_yesterday() {
        let history = vec![entry_on(day(-2)), entry_on(day(-1))];
        assert_eq!(compute_streak(&history, &[], day(0)), 2);
    }

    #[test]
    fn test_gap_breaks_streak() {
        // Active D-3 and D-1, nothing at D-2: the walk must not cross.
        let history = vec![entry_on(day(-3)), entry_on(day(-1))];
        assert_eq!(compute_streak(&history, &[], day(0)), 1);
    }

    #[test]
    fn test_freeze_day_bridges_gap() {
        let history = vec![entry_on(day(-3)), entry_on(day(-1))];
        let freezes = vec![day(-2)];
        assert_eq!(compute_streak(&history, &freezes, day(0)), 3);
    }

    #[test]
    fn test_freeze_day_alone_is_active() {
        let freezes = vec![day(0)];
        assert_eq!(compute_streak(&[], &freezes, day(0)), 1);
    }

    #[test]
    fn test_multiple_entries_same_day_count_once() {
        let history = vec![entry_on(day(0)), entry_on(day(0)), entry_on(day(-1))];
        assert_eq!(compute_streak(&history, &[], day(0)), 2);
    }
}
