//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between the session
//! cache, the generator and the write-behind flusher.

mod player_service;
mod quest_service;
mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use player_service::{PlayerService, Profile};
pub use quest_service::{CompletionResult, QuestService};
pub use session::{Session, SessionManager};
