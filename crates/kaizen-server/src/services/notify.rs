//! Log Notifier
//!
//! Celebrations also travel back to the client inside completion
//! responses; this sink just gives operators a trace of what fired.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use kaizen::{Celebration, Notifier};

#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, account_id: Uuid, celebration: &Celebration) {
        match celebration {
            Celebration::QuestCompleted {
                quest_title,
                xp_gained,
                ..
            } => {
                info!(
                    "{}: quest '{}' completed (+{} XP)",
                    account_id, quest_title, xp_gained
                );
            }
            Celebration::BadgeEarned { name, .. } => {
                info!("{}: badge earned '{}'", account_id, name);
            }
            Celebration::LevelUp {
                level, title_name, ..
            } => {
                info!("{}: reached level {} ({})", account_id, level, title_name);
            }
            Celebration::PerfectDay => {
                info!("{}: perfect day", account_id);
            }
        }
    }
}
