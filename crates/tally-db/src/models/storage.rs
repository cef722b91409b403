//! Storage epoch database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the guild_storages table
#[derive(Debug, Clone, FromRow)]
pub struct GuildStorageModel {
    pub guild_id: i64,
    pub storage_id: String,
    pub created_at: DateTime<Utc>,
}
