//! Subscription database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the subscriptions table
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionModel {
    pub id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub sub_label: Option<String>,
    pub guilds_count: i32,
    pub patreon_user_id: Option<String>,
    pub cancelled: bool,
    pub sub_invalidated: bool,
}
