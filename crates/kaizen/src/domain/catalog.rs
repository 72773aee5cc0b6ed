//! Catalog - Fixed progression tables
//!
//! Titles, badges, preset onboarding goals and the generic
//! completion-message pool. These are product tuning data, kept together
//! so a balance pass touches one file.

use crate::domain::entities::Player;

/// XP multiplier applied to bonus-quest completions (result is floored)
pub const BONUS_QUEST_MULTIPLIER: f64 = 1.5;

/// Per-level growth of the XP threshold (result is floored)
pub const XP_THRESHOLD_GROWTH: f64 = 1.2;

/// Starting XP threshold for level 1
pub const BASE_XP_TO_NEXT: u32 = 100;

/// Daily cap on single-slot refreshes (premium)
pub const MAX_SINGLE_REFRESHES_PER_DAY: u32 = 3;

/// Daily cap on whole-batch refreshes (free accounts)
pub const MAX_BATCH_REFRESHES_PER_DAY: u32 = 2;

/// Quests generated per day for free / premium accounts
pub const FREE_QUEST_COUNT: usize = 3;
pub const PREMIUM_QUEST_COUNT: usize = 5;

/// Minimum days between two streak-freeze uses
pub const STREAK_FREEZE_COOLDOWN_DAYS: i64 = 7;

/// Seconds the undo buffer stays valid after a completion
pub const UNDO_WINDOW_SECS: i64 = 6;

/// Display title attached to a level range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Title {
    /// Highest level this title applies to (`u32::MAX` = catch-all)
    pub max_level: u32,
    pub name: &'static str,
    pub emoji: &'static str,
}

/// Ordered title table; scanned for the first entry covering the level
pub const TITLES: &[Title] = &[
    Title {
        max_level: 5,
        name: "Aventurier",
        emoji: "\u{1f331}",
    },
    Title {
        max_level: 10,
        name: "Disciple",
        emoji: "\u{1f38b}",
    },
    Title {
        max_level: 15,
        name: "Voyageur",
        emoji: "\u{1f5fa}\u{fe0f}",
    },
    Title {
        max_level: 20,
        name: "Ma\u{ee}tre",
        emoji: "\u{26e9}\u{fe0f}",
    },
    Title {
        max_level: 30,
        name: "Sage",
        emoji: "\u{1f9d8}",
    },
    Title {
        max_level: u32::MAX,
        name: "L\u{e9}gende",
        emoji: "\u{2728}",
    },
];

/// Title for a level: first entry whose `max_level` covers it
pub fn title_for_level(level: u32) -> Title {
    *TITLES
        .iter()
        .find(|t| level <= t.max_level)
        .unwrap_or(&TITLES[TITLES.len() - 1])
}

/// Badge definition: a predicate over the full player record.
///
/// Predicates must be monotonic (only thresholds on counters, streaks and
/// levels) because a badge is never re-checked once earned.
#[derive(Clone, Copy)]
pub struct BadgeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub condition: fn(&Player) -> bool,
}

impl std::fmt::Debug for BadgeDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeDef").field("id", &self.id).finish()
    }
}

/// Fixed badge catalog. Evaluation order is notification order when
/// several badges unlock on the same completion.
pub const ALL_BADGES: &[BadgeDef] = &[
    BadgeDef {
        id: "first-quest",
        name: "Premier Pas",
        emoji: "\u{1f525}",
        description: "Compl\u{e9}ter la 1\u{e8}re qu\u{ea}te",
        condition: |p| p.quests_completed >= 1,
    },
    BadgeDef {
        id: "explorer",
        name: "Explorateur",
        emoji: "\u{1f31f}",
        description: "Atteindre le niveau 5",
        condition: |p| p.level >= 5,
    },
    BadgeDef {
        id: "master",
        name: "Ma\u{ee}tre",
        emoji: "\u{1f3c6}",
        description: "Atteindre le niveau 10",
        condition: |p| p.level >= 10,
    },
    BadgeDef {
        id: "centurion",
        name: "Centurion",
        emoji: "\u{1f4af}",
        description: "Compl\u{e9}ter 100 qu\u{ea}tes",
        condition: |p| p.quests_completed >= 100,
    },
    BadgeDef {
        id: "perfectionist",
        name: "Perfectionniste",
        emoji: "\u{26a1}",
        description: "Compl\u{e9}ter 25 qu\u{ea}tes difficiles",
        condition: |p| p.hard_quests_completed >= 25,
    },
];

/// Preset onboarding goal
#[derive(Debug, Clone, Copy)]
pub struct PresetGoal {
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
}

pub const PRESET_GOALS: &[PresetGoal] = &[
    PresetGoal {
        id: "fitness",
        label: "Bouger plus au quotidien",
        emoji: "\u{1f4aa}",
    },
    PresetGoal {
        id: "creative",
        label: "Pratiquer une activit\u{e9} cr\u{e9}ative",
        emoji: "\u{1f3a8}",
    },
    PresetGoal {
        id: "organized",
        label: "Mieux structurer mes journ\u{e9}es",
        emoji: "\u{1f4cb}",
    },
    PresetGoal {
        id: "learning",
        label: "Apprendre quelque chose chaque jour",
        emoji: "\u{1f4da}",
    },
    PresetGoal {
        id: "wellness",
        label: "Prendre du temps pour moi",
        emoji: "\u{1f9d8}",
    },
    PresetGoal {
        id: "financial",
        label: "Mieux g\u{e9}rer mon argent",
        emoji: "\u{1f4b0}",
    },
];

/// Fallback completion messages for free accounts
pub const GENERIC_COMPLETION_MESSAGES: &[&str] = &[
    "Chaque petit pas compte sur le chemin de ta progression.",
    "Une action de plus vers la meilleure version de toi-m\u{ea}me.",
    "La constance est la cl\u{e9} de toute transformation.",
    "Tu construis tes habitudes, une qu\u{ea}te \u{e0} la fois.",
    "Le plus important, c'est de continuer \u{e0} avancer.",
    "Ta discipline d'aujourd'hui est ta libert\u{e9} de demain.",
    "Chaque effort te rapproche de ton objectif.",
    "La progression se cache dans la r\u{e9}gularit\u{e9}.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_table_scan() {
        assert_eq!(title_for_level(1).name, "Aventurier");
        assert_eq!(title_for_level(5).name, "Aventurier");
        assert_eq!(title_for_level(6).name, "Disciple");
        assert_eq!(title_for_level(30).name, "Sage");
        assert_eq!(title_for_level(31).name, "L\u{e9}gende");
        assert_eq!(title_for_level(9999).name, "L\u{e9}gende");
    }

    #[test]
    fn test_badge_catalog_ids_unique() {
        let mut ids: Vec<&str> = ALL_BADGES.iter().map(|b| b.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ALL_BADGES.len());
    }
}
