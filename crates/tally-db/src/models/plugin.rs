//! Plugin config database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the plugin_configs table
#[derive(Debug, Clone, FromRow)]
pub struct PluginConfigModel {
    pub guild_id: i64,
    pub name: String,
    pub config: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
