//! Cache key conventions
//!
//! Every key is derived deterministically from the entity kind and its
//! identifying fields. Member and leaderboard keys carry the storage epoch, so
//! a rotation naturally strands the old epoch's entries instead of requiring a
//! sweep.

use tally_core::value_objects::{Snowflake, StorageId};

/// Guild settings hash
pub fn guild_settings(guild_id: Snowflake) -> String {
    format!("settings:{guild_id}")
}

/// Member counters hash for one epoch
pub fn member(guild_id: Snowflake, storage_id: &StorageId, user_id: Snowflake) -> String {
    format!("members:{guild_id}:{storage_id}:{user_id}")
}

/// Leaderboard JSON list for one epoch
pub fn leaderboard(guild_id: Snowflake, storage_id: &StorageId) -> String {
    format!("leaderboard:{guild_id}:{storage_id}")
}

/// Subscription JSON list
pub fn subscriptions(guild_id: Snowflake) -> String {
    format!("subs:{guild_id}")
}

/// Alert JSON list
pub fn alerts(guild_id: Snowflake) -> String {
    format!("alerts:{guild_id}")
}

/// Plugin config JSON list
pub fn plugins(guild_id: Snowflake) -> String {
    format!("plugins:{guild_id}")
}

/// Blacklist member set
pub fn blacklist(guild_id: Snowflake) -> String {
    format!("blacklist:{guild_id}")
}
