//! PostgreSQL adapters for the repository ports

mod daily_quests_repository;
mod history_repository;
mod player_repository;

pub use daily_quests_repository::PgDailyQuestsRepository;
pub use history_repository::PgHistoryRepository;
pub use player_repository::PgPlayerRepository;
