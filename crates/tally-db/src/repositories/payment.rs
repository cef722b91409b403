//! PostgreSQL implementation of PaymentRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::{NewPayment, Payment};
use tally_core::traits::{PaymentRepository, RepoResult};
use tally_core::value_objects::Snowflake;

use crate::models::PaymentModel;

use super::error::map_db_error;

/// PostgreSQL implementation of PaymentRepository
#[derive(Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    /// Create a new PgPaymentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    #[instrument(skip(self, payment))]
    async fn create(&self, payment: &NewPayment) -> RepoResult<Payment> {
        let result = sqlx::query_as::<_, PaymentModel>(
            r"
            INSERT INTO payments (subscription_id, payment_type, amount_cents, currency, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, subscription_id, payment_type, amount_cents, currency, created_at
            ",
        )
        .bind(payment.subscription_id)
        .bind(&payment.payment_type)
        .bind(payment.amount_cents)
        .bind(&payment.currency)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Payment::from(result))
    }

    #[instrument(skip(self))]
    async fn find_by_subscription(&self, subscription_id: i64) -> RepoResult<Vec<Payment>> {
        let results = sqlx::query_as::<_, PaymentModel>(
            r"
            SELECT id, subscription_id, payment_type, amount_cents, currency, created_at
            FROM payments
            WHERE subscription_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(subscription_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Payment::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Payment>> {
        let results = sqlx::query_as::<_, PaymentModel>(
            r"
            SELECT p.id, p.subscription_id, p.payment_type, p.amount_cents, p.currency, p.created_at
            FROM payments p
            JOIN guild_subscriptions gs ON gs.subscription_id = p.subscription_id
            WHERE gs.guild_id = $1
            ORDER BY p.created_at ASC, p.id ASC
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Payment::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgPaymentRepository>();
    }
}
