//! QuestHistory Repository Port
//!
//! The history is an append-only log but is stored as one document, the
//! way the original three-document layout works: the full entry list is
//! written on save.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, QuestHistoryEntry};

/// Repository interface for the per-account completion history
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn load(&self, account_id: Uuid) -> Result<Vec<QuestHistoryEntry>, DomainError>;

    async fn save(&self, account_id: Uuid, entries: &[QuestHistoryEntry])
        -> Result<(), DomainError>;

    async fn delete(&self, account_id: Uuid) -> Result<bool, DomainError>;
}
