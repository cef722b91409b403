//! PostgreSQL implementation of MemberEventRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::{MemberEvent, NewMemberEvent};
use tally_core::traits::{MemberEventRepository, RepoResult};
use tally_core::value_objects::Snowflake;

use crate::models::MemberEventModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MemberEventRepository
#[derive(Clone)]
pub struct PgMemberEventRepository {
    pool: PgPool,
}

impl PgMemberEventRepository {
    /// Create a new PgMemberEventRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberEventRepository for PgMemberEventRepository {
    #[instrument(skip(self, event))]
    async fn append(&self, event: &NewMemberEvent) -> RepoResult<MemberEvent> {
        let result = sqlx::query_as::<_, MemberEventModel>(
            r"
            INSERT INTO member_events (guild_id, storage_id, user_id, inviter_id, kind, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, guild_id, storage_id, user_id, inviter_id, kind, created_at
            ",
        )
        .bind(event.guild_id.into_inner())
        .bind(event.storage_id.as_str())
        .bind(event.user_id.into_inner())
        .bind(event.inviter_id.map(Snowflake::into_inner))
        .bind(event.kind.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        MemberEvent::try_from(result)
    }

    #[instrument(skip(self))]
    async fn find_by_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Vec<MemberEvent>> {
        let results = sqlx::query_as::<_, MemberEventModel>(
            r"
            SELECT id, guild_id, storage_id, user_id, inviter_id, kind, created_at
            FROM member_events
            WHERE guild_id = $1 AND user_id = $2
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(MemberEvent::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_inviter(
        &self,
        guild_id: Snowflake,
        inviter_id: Snowflake,
    ) -> RepoResult<Vec<MemberEvent>> {
        let results = sqlx::query_as::<_, MemberEventModel>(
            r"
            SELECT id, guild_id, storage_id, user_id, inviter_id, kind, created_at
            FROM member_events
            WHERE guild_id = $1 AND inviter_id = $2
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(guild_id.into_inner())
        .bind(inviter_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(MemberEvent::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMemberEventRepository>();
    }
}
