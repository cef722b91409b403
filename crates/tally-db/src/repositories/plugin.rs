//! PostgreSQL implementation of PluginRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::PluginConfig;
use tally_core::traits::{PluginRepository, RepoResult};
use tally_core::value_objects::Snowflake;

use crate::models::PluginConfigModel;

use super::error::map_db_error;

/// PostgreSQL implementation of PluginRepository
#[derive(Clone)]
pub struct PgPluginRepository {
    pool: PgPool,
}

impl PgPluginRepository {
    /// Create a new PgPluginRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PluginRepository for PgPluginRepository {
    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<PluginConfig>> {
        let results = sqlx::query_as::<_, PluginConfigModel>(
            r"
            SELECT guild_id, name, config, updated_at
            FROM plugin_configs
            WHERE guild_id = $1
            ORDER BY name ASC
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(PluginConfig::from).collect())
    }

    #[instrument(skip(self, config))]
    async fn upsert(&self, config: &PluginConfig) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO plugin_configs (guild_id, name, config, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (guild_id, name)
            DO UPDATE SET config = EXCLUDED.config, updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(config.guild_id.into_inner())
        .bind(&config.name)
        .bind(&config.config)
        .bind(config.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
