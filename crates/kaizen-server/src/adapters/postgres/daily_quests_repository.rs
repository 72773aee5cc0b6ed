//! PostgreSQL implementation of DailyQuestsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use kaizen::{DailyQuests, DailyQuestsRepository, DomainError};

pub struct PgDailyQuestsRepository {
    pool: PgPool,
}

impl PgDailyQuestsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DailyQuestsRepository for PgDailyQuestsRepository {
    async fn load(&self, account_id: Uuid) -> Result<Option<DailyQuests>, DomainError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT data FROM daily_quest_documents WHERE account_id = $1")
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::Repository(e.to_string()))?;

        match row {
            Some((data,)) => serde_json::from_value(data).map(Some).map_err(|e| {
                DomainError::Repository(format!("daily quests document unreadable: {}", e))
            }),
            None => Ok(None),
        }
    }

    async fn save(&self, account_id: Uuid, daily: &DailyQuests) -> Result<(), DomainError> {
        let data =
            serde_json::to_value(daily).map_err(|e| DomainError::Repository(e.to_string()))?;

        sqlx::query(
            "INSERT INTO daily_quest_documents (account_id, data, updated_at)
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
        let result = sqlx::query("DELETE FROM daily_quest_documents WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
