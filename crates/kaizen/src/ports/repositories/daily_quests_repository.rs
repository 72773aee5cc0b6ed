//! DailyQuests Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, DailyQuests};

/// Repository interface for the per-account daily quest batch
#[async_trait]
pub trait DailyQuestsRepository: Send + Sync {
    async fn load(&self, account_id: Uuid) -> Result<Option<DailyQuests>, DomainError>;

    async fn save(&self, account_id: Uuid, daily: &DailyQuests) -> Result<(), DomainError>;

    async fn delete(&self, account_id: Uuid) -> Result<bool, DomainError>;
}
