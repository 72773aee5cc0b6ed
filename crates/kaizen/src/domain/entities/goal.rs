//! Goal and Theme - User-declared improvement areas
//!
//! A goal owns a fixed set of themes produced at creation time; only the
//! per-theme counters move afterwards. The theme list is never replaced
//! wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::DevelopmentLevel;

/// A sub-dimension of a goal, tracked independently
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Generator-assigned slug, unique within the goal
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quests_completed: u32,
    #[serde(default)]
    pub last_touched: Option<DateTime<Utc>>,
    #[serde(default)]
    pub development_level: DevelopmentLevel,
}

impl Theme {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            quests_completed: 0,
            last_touched: None,
            development_level: DevelopmentLevel::None,
        }
    }

    /// Record one linked completion; the tier is recomputed from the
    /// counter so the two can never drift apart.
    pub fn record_completion(&mut self, now: DateTime<Utc>) {
        self.quests_completed += 1;
        self.last_touched = Some(now);
        self.development_level = DevelopmentLevel::from_quests_completed(self.quests_completed);
    }
}

/// A user-declared area of self-improvement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub label: String,
    /// Free-text hint fed to quest generation
    #[serde(default)]
    pub context: Option<String>,
    pub themes: Vec<Theme>,
    pub created_at: DateTime<Utc>,
    /// Once set the goal is read-only and excluded from generation
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn new(label: String, context: Option<String>, themes: Vec<Theme>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label,
            context,
            themes,
            created_at: Utc::now(),
            archived_at: None,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// A goal becomes archivable once every theme is high or advanced
    pub fn is_archivable(&self) -> bool {
        !self.themes.is_empty() && self.themes.iter().all(|t| t.development_level.is_developed())
    }

    pub fn theme_mut(&mut self, theme_id: &str) -> Option<&mut Theme> {
        self.themes.iter_mut().find(|t| t.id == theme_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_with_counts(counts: &[u32]) -> Goal {
        let themes = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let mut t = Theme::new(format!("t{}", i), format!("Theme {}", i));
                for _ in 0..c {
                    t.record_completion(Utc::now());
                }
                t
            })
            .collect();
        Goal::new("Test".to_string(), None, themes)
    }

    #[test]
    fn test_record_completion_recomputes_tier() {
        let mut theme = Theme::new("t".to_string(), "T".to_string());
        assert_eq!(theme.development_level, DevelopmentLevel::None);
        theme.record_completion(Utc::now());
        assert_eq!(theme.quests_completed, 1);
        assert_eq!(theme.development_level, DevelopmentLevel::Low);
        assert!(theme.last_touched.is_some());
    }

    #[test]
    fn test_archivable_requires_all_themes_developed() {
        assert!(!goal_with_counts(&[8, 3]).is_archivable());
        assert!(goal_with_counts(&[8, 16]).is_archivable());
        assert!(!goal_with_counts(&[]).is_archivable());
    }
}
