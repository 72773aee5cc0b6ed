//! Infrastructure adapters (implementations of domain ports)

pub mod postgres;

pub use postgres::{PgDailyQuestsRepository, PgHistoryRepository, PgPlayerRepository};
