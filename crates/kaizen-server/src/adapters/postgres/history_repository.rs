//! PostgreSQL implementation of HistoryRepository
//!
//! Stored as `{"entries": [...]}` - the wrapper object mirrors the
//! original history document shape.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use kaizen::{DomainError, HistoryRepository, QuestHistoryEntry};

pub struct PgHistoryRepository {
    pool: PgPool,
}

impl PgHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Serialize, Deserialize)]
struct HistoryDocument {
    #[serde(default)]
    entries: Vec<QuestHistoryEntry>,
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    async fn load(&self, account_id: Uuid) -> Result<Vec<QuestHistoryEntry>, DomainError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT data FROM history_documents WHERE account_id = $1")
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::Repository(e.to_string()))?;

        match row {
            Some((data,)) => serde_json::from_value::<HistoryDocument>(data)
                .map(|doc| doc.entries)
                .map_err(|e| {
                    DomainError::Repository(format!("history document unreadable: {}", e))
                }),
            None => Ok(Vec::new()),
        }
    }

    async fn save(
        &self,
        account_id: Uuid,
        entries: &[QuestHistoryEntry],
    ) -> Result<(), DomainError> {
        let data = serde_json::to_value(HistoryDocument {
            entries: entries.to_vec(),
        })
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        sqlx::query(
            "INSERT INTO history_documents (account_id, data, updated_at)
             VALUES ($1, $2, now())
             ON CONFLICT (account_id) DO UPDATE SET data = $2, updated_at = now()",
        )
        .bind(account_id)
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, account_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM history_documents WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
