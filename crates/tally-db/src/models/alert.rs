//! Alert database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the alerts table
#[derive(Debug, Clone, FromRow)]
pub struct AlertModel {
    pub id: i64,
    pub guild_id: i64,
    pub channel_id: i64,
    pub message: String,
    pub invite_count: i32,
    pub alert_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
