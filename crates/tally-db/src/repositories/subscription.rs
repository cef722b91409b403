//! PostgreSQL implementation of SubscriptionRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::{NewSubscription, Subscription, SubscriptionField, SubscriptionValue};
use tally_core::traits::{RepoResult, SubscriptionRepository};
use tally_core::value_objects::Snowflake;

use crate::models::SubscriptionModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SubscriptionRepository
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Create a new PgSubscriptionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Subscription>> {
        let results = sqlx::query_as::<_, SubscriptionModel>(
            r"
            SELECT s.id, s.expires_at, s.created_at, s.sub_label, s.guilds_count,
                   s.patreon_user_id, s.cancelled, s.sub_invalidated
            FROM subscriptions s
            JOIN guild_subscriptions gs ON gs.subscription_id = s.id
            WHERE gs.guild_id = $1
            ORDER BY s.created_at DESC, s.id DESC
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Subscription::from).collect())
    }

    #[instrument(skip(self, subscription))]
    async fn create(
        &self,
        guild_id: Snowflake,
        subscription: &NewSubscription,
    ) -> RepoResult<Subscription> {
        let result = sqlx::query_as::<_, SubscriptionModel>(
            r"
            INSERT INTO subscriptions (expires_at, created_at, sub_label, guilds_count,
                                       patreon_user_id, cancelled, sub_invalidated)
            VALUES ($1, $2, $3, $4, $5, FALSE, FALSE)
            RETURNING id, expires_at, created_at, sub_label, guilds_count,
                      patreon_user_id, cancelled, sub_invalidated
            ",
        )
        .bind(subscription.expires_at)
        .bind(Utc::now())
        .bind(&subscription.sub_label)
        .bind(subscription.guilds_count)
        .bind(&subscription.patreon_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let subscription = Subscription::from(result);
        self.link_guild(subscription.id, guild_id).await?;

        Ok(subscription)
    }

    #[instrument(skip(self))]
    async fn link_guild(&self, subscription_id: i64, guild_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO guild_subscriptions (guild_id, subscription_id)
            VALUES ($1, $2)
            ON CONFLICT (guild_id, subscription_id) DO NOTHING
            ",
        )
        .bind(guild_id.into_inner())
        .bind(subscription_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, value))]
    async fn update_field(
        &self,
        subscription_id: i64,
        field: SubscriptionField,
        value: &SubscriptionValue,
    ) -> RepoResult<()> {
        // The column name comes from the allow-list enum, never from a caller.
        let sql = format!(
            "UPDATE subscriptions SET {column} = $2 WHERE id = $1",
            column = field.column()
        );

        let query = sqlx::query(&sql).bind(subscription_id);
        let query = match value {
            SubscriptionValue::Timestamp(ts) => query.bind(*ts),
            SubscriptionValue::OptionalText(text) => query.bind(text.as_deref()),
            SubscriptionValue::Int(n) => query.bind(*n),
            SubscriptionValue::Flag(b) => query.bind(*b),
        };

        query.execute(&self.pool).await.map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSubscriptionRepository>();
    }
}
