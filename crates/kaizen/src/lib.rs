//! Kaizen Domain Library
//!
//! Core domain types and interfaces for the Kaizen Quest progression
//! engine: daily AI-generated quests, XP and levels, streaks, badges and
//! narrative chapters.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture
//! principles:
//!
//! - **Domain Layer** (`domain/`): Pure progression logic
//!   - `entities/`: Core domain models (Player, Goal, Theme, Quest,
//!     DailyQuests, QuestHistoryEntry)
//!   - `value_objects/`: Immutable value types (Difficulty, Category,
//!     QuestStatus, DevelopmentLevel, Feedback)
//!   - `catalog`: Fixed progression tables (titles, badges, presets)
//!   - `progression`: The pure completion transition and undo snapshot
//!   - `errors`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Whole-document persistence interfaces
//!   - `services/`: Quest generator and celebration notifier interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use kaizen::domain::{apply_completion, DailyQuests, Player};
//! use kaizen::ports::{PlayerRepository, QuestGenerator};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    apply_completion, catalog, completion_xp, compute_streak, Category, CompletionOutcome,
    DailyQuests, DevelopmentLevel, Difficulty, DomainError, Feedback, Goal, LevelUp, Player,
    Quest, QuestHistoryEntry, QuestStatus, StoryChapter, Theme, UndoSnapshot, XpAward,
};
pub use ports::{
    celebrations_for, Celebration, ChapterSummary, DailyQuestsRepository, GeneratedQuest,
    GeneratedTheme, GoalContext, HistoryRepository, Notifier, PlayerRepository,
    QuestBatchRequest, QuestGenerator, StoryRequest, ThemeContext,
};
