//! PostgreSQL implementation of PlayerRepository
//!
//! The player record is stored as one JSONB document per account;
//! deserialization defaults missing optional fields, which is the only
//! schema-migration guarantee the engine makes.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use kaizen::{DomainError, Player, PlayerRepository};

pub struct PgPlayerRepository {
    pool: PgPool,
}

impl PgPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for PgPlayerRepository {
    async fn load(&self, account_id: Uuid) -> Result<Option<Player>, DomainError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT data FROM player_documents WHERE account_id = $1")
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::Repository(e.to_string()))?;

        match row {
            Some((data,)) => serde_json::from_value(data)
                .map(Some)
                .map_err(|e| DomainError::Repository(format!("player document unreadable: {}", e))),
            None => Ok(None),
        }
    }

    async fn save(&self, account_id: Uuid, player: &Player) -> Result<(), DomainError> {
        let data = serde_json::to_value(player)
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        sqlx::query(
            "INSERT INTO player_documents (account_id, data, updated_at)
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
        let result = sqlx::query("DELETE FROM player_documents WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
