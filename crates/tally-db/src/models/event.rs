//! Member event database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the member_events table
#[derive(Debug, Clone, FromRow)]
pub struct MemberEventModel {
    pub id: i64,
    pub guild_id: i64,
    pub storage_id: String,
    pub user_id: i64,
    pub inviter_id: Option<i64>,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}
