//! Payment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the payments table
#[derive(Debug, Clone, FromRow)]
pub struct PaymentModel {
    pub id: i64,
    pub subscription_id: i64,
    pub payment_type: String,
    pub amount_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}
