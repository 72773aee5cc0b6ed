//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Player: persistent progression record (level, XP, badges, goals)
//! - Goal / Theme: user-declared improvement areas with development tiers
//! - Quest / DailyQuests: one day's quest batch and its state machine
//! - QuestHistoryEntry: append-only completion log driving streaks

mod goal;
mod history;
mod player;
mod quest;

pub use goal::*;
pub use history::*;
pub use player::*;
pub use quest::*;
