//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::{InviteKind, InviteTotals, LeaderboardEntry, MemberCounters};
use tally_core::traits::{MemberRepository, RepoResult};
use tally_core::value_objects::{Snowflake, StorageId};

use crate::models::{InviteTotalsModel, LeaderboardRowModel, MemberCountersModel};

use super::error::map_db_error;

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberCounters>> {
        let result = sqlx::query_as::<_, MemberCountersModel>(
            r"
            SELECT guild_id, storage_id, user_id, regular, leaves, bonus, fake
            FROM members
            WHERE guild_id = $1 AND storage_id = $2 AND user_id = $3
            ",
        )
        .bind(guild_id.into_inner())
        .bind(storage_id.as_str())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(MemberCounters::try_from).transpose()
    }

    #[instrument(skip(self, member))]
    async fn create(&self, member: &MemberCounters) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO members (guild_id, storage_id, user_id,
                                 regular, leaves, bonus, fake,
                                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (guild_id, storage_id, user_id) DO NOTHING
            ",
        )
        .bind(member.guild_id.into_inner())
        .bind(member.storage_id.as_str())
        .bind(member.user_id.into_inner())
        .bind(member.regular)
        .bind(member.leaves)
        .bind(member.bonus)
        .bind(member.fake)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
        kind: InviteKind,
        delta: i64,
    ) -> RepoResult<()> {
        // The column name comes from the allow-list enum, never from a caller.
        let sql = format!(
            "UPDATE members SET {column} = {column} + $4, updated_at = NOW()
             WHERE guild_id = $1 AND storage_id = $2 AND user_id = $3",
            column = kind.column()
        );

        sqlx::query(&sql)
            .bind(guild_id.into_inner())
            .bind(storage_id.as_str())
            .bind(user_id.into_inner())
            .bind(delta)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, user_ids), fields(users = user_ids.len()))]
    async fn increment_many(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_ids: &[Snowflake],
        kind: InviteKind,
        delta: i64,
    ) -> RepoResult<u64> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i64> = user_ids.iter().copied().map(Snowflake::into_inner).collect();
        let sql = format!(
            "UPDATE members SET {column} = {column} + $4, updated_at = NOW()
             WHERE guild_id = $1 AND storage_id = $2 AND user_id = ANY($3)",
            column = kind.column()
        );

        let result = sqlx::query(&sql)
            .bind(guild_id.into_inner())
            .bind(storage_id.as_str())
            .bind(&ids)
            .bind(delta)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn totals(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
    ) -> RepoResult<InviteTotals> {
        // SUM(bigint) yields NUMERIC; cast back so the row decodes as i64.
        let result = sqlx::query_as::<_, InviteTotalsModel>(
            r"
            SELECT CAST(COALESCE(SUM(regular), 0) AS BIGINT) AS regular,
                   CAST(COALESCE(SUM(leaves), 0) AS BIGINT) AS leaves,
                   CAST(COALESCE(SUM(bonus), 0) AS BIGINT) AS bonus,
                   CAST(COALESCE(SUM(fake), 0) AS BIGINT) AS fake
            FROM members
            WHERE guild_id = $1 AND storage_id = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(storage_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(InviteTotals::from(result))
    }

    #[instrument(skip(self))]
    async fn leaderboard(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        limit: Option<i64>,
    ) -> RepoResult<Vec<LeaderboardEntry>> {
        // LIMIT NULL is LIMIT ALL in Postgres, so the optional cap binds as-is.
        let results = sqlx::query_as::<_, LeaderboardRowModel>(
            r"
            SELECT m.user_id, m.regular, m.leaves, m.bonus, m.fake,
                   (m.regular + m.bonus - m.leaves - m.fake) AS net
            FROM members m
            WHERE m.guild_id = $1 AND m.storage_id = $2
              AND (m.regular + m.bonus - m.leaves - m.fake) > 0
              AND NOT EXISTS (
                  SELECT 1 FROM invite_blacklist b
                  WHERE b.guild_id = m.guild_id AND b.user_id = m.user_id
              )
            ORDER BY net DESC, m.user_id ASC
            LIMIT $3
            ",
        )
        .bind(guild_id.into_inner())
        .bind(storage_id.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(LeaderboardEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMemberRepository>();
    }
}
