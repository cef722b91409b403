//! PostgreSQL implementation of AlertRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::{Alert, AlertField, AlertValue, NewAlert};
use tally_core::traits::{AlertRepository, RepoResult};
use tally_core::value_objects::Snowflake;

use crate::models::AlertModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AlertRepository
#[derive(Clone)]
pub struct PgAlertRepository {
    pool: PgPool,
}

impl PgAlertRepository {
    /// Create a new PgAlertRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertRepository for PgAlertRepository {
    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Alert>> {
        let results = sqlx::query_as::<_, AlertModel>(
            r"
            SELECT id, guild_id, channel_id, message, invite_count, alert_type,
                   created_at, updated_at
            FROM alerts
            WHERE guild_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Alert::try_from).collect()
    }

    #[instrument(skip(self, alert))]
    async fn create(&self, alert: &NewAlert) -> RepoResult<Alert> {
        let result = sqlx::query_as::<_, AlertModel>(
            r"
            INSERT INTO alerts (guild_id, channel_id, message, invite_count, alert_type,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, guild_id, channel_id, message, invite_count, alert_type,
                      created_at, updated_at
            ",
        )
        .bind(alert.guild_id.into_inner())
        .bind(alert.channel_id.into_inner())
        .bind(&alert.message)
        .bind(alert.invite_count)
        .bind(alert.alert_type.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Alert::try_from(result)
    }

    #[instrument(skip(self, value))]
    async fn update_field(
        &self,
        alert_id: i64,
        field: AlertField,
        value: &AlertValue,
    ) -> RepoResult<()> {
        // The column name comes from the allow-list enum, never from a caller.
        let sql = format!(
            "UPDATE alerts SET {column} = $2, updated_at = NOW() WHERE id = $1",
            column = field.column()
        );

        let query = sqlx::query(&sql).bind(alert_id);
        let query = match value {
            AlertValue::Id(id) => query.bind(id.into_inner()),
            AlertValue::Text(text) => query.bind(text),
            AlertValue::Int(n) => query.bind(*n),
            AlertValue::Kind(kind) => query.bind(kind.as_str()),
        };

        query.execute(&self.pool).await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, alert_id: i64) -> RepoResult<()> {
        sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(alert_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
