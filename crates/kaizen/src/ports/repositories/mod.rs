//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod daily_quests_repository;
mod history_repository;
mod player_repository;

pub use daily_quests_repository::*;
pub use history_repository::*;
pub use player_repository::*;
