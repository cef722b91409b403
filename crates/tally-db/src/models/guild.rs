//! Guild settings database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the guilds table
#[derive(Debug, Clone, FromRow)]
pub struct GuildSettingsModel {
    pub guild_id: i64,
    pub language: String,
    pub prefix: String,
    pub command_channel: Option<i64>,
    pub fake_threshold: Option<i32>,
    pub storage_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
