//! PostgreSQL implementation of GuildStorageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::GuildStorage;
use tally_core::traits::{GuildStorageRepository, RepoResult};
use tally_core::value_objects::{Snowflake, StorageId};

use crate::models::GuildStorageModel;

use super::error::map_db_error;

/// PostgreSQL implementation of GuildStorageRepository
#[derive(Clone)]
pub struct PgGuildStorageRepository {
    pool: PgPool,
}

impl PgGuildStorageRepository {
    /// Create a new PgGuildStorageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuildStorageRepository for PgGuildStorageRepository {
    #[instrument(skip(self, storage))]
    async fn insert(&self, storage: &GuildStorage) -> RepoResult<()> {
        // DO NOTHING: two racing provisioners insert the same first epoch.
        sqlx::query(
            r"
            INSERT INTO guild_storages (guild_id, storage_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (guild_id, storage_id) DO NOTHING
            ",
        )
        .bind(storage.guild_id.into_inner())
        .bind(storage.storage_id.as_str())
        .bind(storage.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_latest_other(
        &self,
        guild_id: Snowflake,
        current: &StorageId,
    ) -> RepoResult<Option<GuildStorage>> {
        let result = sqlx::query_as::<_, GuildStorageModel>(
            r"
            SELECT guild_id, storage_id, created_at
            FROM guild_storages
            WHERE guild_id = $1 AND storage_id <> $2
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(guild_id.into_inner())
        .bind(current.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(GuildStorage::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<GuildStorage>> {
        let results = sqlx::query_as::<_, GuildStorageModel>(
            r"
            SELECT guild_id, storage_id, created_at
            FROM guild_storages
            WHERE guild_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(GuildStorage::try_from).collect()
    }
}
