//! PostgreSQL implementation of GuildSettingsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::{GuildSetting, GuildSettings, SettingValue};
use tally_core::error::StoreError;
use tally_core::traits::{GuildSettingsRepository, RepoResult};
use tally_core::value_objects::{Snowflake, StorageId};

use crate::models::GuildSettingsModel;

use super::error::map_db_error;

/// PostgreSQL implementation of GuildSettingsRepository
#[derive(Clone)]
pub struct PgGuildSettingsRepository {
    pool: PgPool,
}

impl PgGuildSettingsRepository {
    /// Create a new PgGuildSettingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuildSettingsRepository for PgGuildSettingsRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>> {
        let result = sqlx::query_as::<_, GuildSettingsModel>(
            r"
            SELECT guild_id, language, prefix, command_channel, fake_threshold,
                   storage_id, created_at, updated_at
            FROM guilds
            WHERE guild_id = $1
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(GuildSettings::try_from).transpose()
    }

    #[instrument(skip(self, settings))]
    async fn insert(&self, settings: &GuildSettings) -> RepoResult<()> {
        // DO NOTHING keeps concurrent lazy provisioning idempotent; the loser
        // of the race reads the winner's row on its next fetch.
        sqlx::query(
            r"
            INSERT INTO guilds (guild_id, language, prefix, command_channel,
                                fake_threshold, storage_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (guild_id) DO NOTHING
            ",
        )
        .bind(settings.guild_id.into_inner())
        .bind(&settings.language)
        .bind(&settings.prefix)
        .bind(settings.command_channel.map(Snowflake::into_inner))
        .bind(settings.fake_threshold)
        .bind(settings.storage_id.as_str())
        .bind(settings.created_at)
        .bind(settings.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, value))]
    async fn update_setting(
        &self,
        guild_id: Snowflake,
        setting: GuildSetting,
        value: &SettingValue,
    ) -> RepoResult<()> {
        // The column name comes from the allow-list enum, never from a caller.
        let sql = format!(
            "UPDATE guilds SET {column} = $2, updated_at = NOW() WHERE guild_id = $1",
            column = setting.column()
        );

        let query = sqlx::query(&sql).bind(guild_id.into_inner());
        let query = match value {
            SettingValue::Text(s) => query.bind(s),
            SettingValue::OptionalId(id) => query.bind(id.map(Snowflake::into_inner)),
            SettingValue::OptionalInt(n) => query.bind(*n),
        };

        query.execute(&self.pool).await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_storage_pointer(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE guilds SET storage_id = $2, updated_at = NOW() WHERE guild_id = $1
            ",
        )
        .bind(guild_id.into_inner())
        .bind(storage_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        // The rotation only counts once this statement touched the row.
        if result.rows_affected() == 0 {
            return Err(StoreError::QueryFailed(format!(
                "guild {guild_id} has no settings row to repoint"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgGuildSettingsRepository>();
    }
}
