//! DevelopmentLevel - How far a theme has been exercised
//!
//! Always recomputed from the theme's completion counter, never stored
//! independently of it.

use serde::{Deserialize, Serialize};

/// Development tier of a theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DevelopmentLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
    Advanced,
}

impl DevelopmentLevel {
    /// Tier implied by a completion counter. A counter of 0 keeps `None`
    /// (the creation-time tier); the table applies from the first
    /// completion: 1-3 low, 4-7 medium, 8-15 high, 16+ advanced.
    pub fn from_quests_completed(count: u32) -> Self {
        match count {
            0 => DevelopmentLevel::None,
            1..=3 => DevelopmentLevel::Low,
            4..=7 => DevelopmentLevel::Medium,
            8..=15 => DevelopmentLevel::High,
            _ => DevelopmentLevel::Advanced,
        }
    }

    /// Difficulty the generator should aim for at this tier
    pub fn suggested_difficulty(&self) -> super::Difficulty {
        match self {
            DevelopmentLevel::None | DevelopmentLevel::Low => super::Difficulty::Easy,
            DevelopmentLevel::Medium => super::Difficulty::Medium,
            DevelopmentLevel::High | DevelopmentLevel::Advanced => super::Difficulty::Hard,
        }
    }

    /// A theme at this tier counts toward goal archivability
    pub fn is_developed(&self) -> bool {
        matches!(self, DevelopmentLevel::High | DevelopmentLevel::Advanced)
    }
}

impl std::fmt::Display for DevelopmentLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DevelopmentLevel::None => write!(f, "none"),
            DevelopmentLevel::Low => write!(f, "low"),
            DevelopmentLevel::Medium => write!(f, "medium"),
            DevelopmentLevel::High => write!(f, "high"),
            DevelopmentLevel::Advanced => write!(f, "advanced"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(
            DevelopmentLevel::from_quests_completed(0),
            DevelopmentLevel::None
        );
        assert_eq!(
            DevelopmentLevel::from_quests_completed(1),
            DevelopmentLevel::Low
        );
        assert_eq!(
            DevelopmentLevel::from_quests_completed(3),
            DevelopmentLevel::Low
        );
        assert_eq!(
            DevelopmentLevel::from_quests_completed(4),
            DevelopmentLevel::Medium
        );
        assert_eq!(
            DevelopmentLevel::from_quests_completed(7),
            DevelopmentLevel::Medium
        );
        assert_eq!(
            DevelopmentLevel::from_quests_completed(8),
            DevelopmentLevel::High
        );
        assert_eq!(
            DevelopmentLevel::from_quests_completed(15),
            DevelopmentLevel::High
        );
        assert_eq!(
            DevelopmentLevel::from_quests_completed(16),
            DevelopmentLevel::Advanced
        );
    }
}
