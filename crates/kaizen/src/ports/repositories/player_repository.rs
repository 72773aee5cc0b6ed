//! Player Repository Port
//!
//! Whole-document persistence for the player record, keyed by account.
//! No schema migration guarantees beyond best-effort defaulting of
//! missing optional fields at deserialization time.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Player};

/// Repository interface for Player documents
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Load the player document, `None` when absent
    async fn load(&self, account_id: Uuid) -> Result<Option<Player>, DomainError>;

    /// Persist the full document (last write wins)
    async fn save(&self, account_id: Uuid, player: &Player) -> Result<(), DomainError>;

    /// Remove the document; returns whether one existed
    async fn delete(&self, account_id: Uuid) -> Result<bool, DomainError>;
}
