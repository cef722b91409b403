//! Storage epoch entity

use chrono::{DateTime, Utc};

use crate::value_objects::{Snowflake, StorageId};

/// One invite-counting epoch of a guild. Immutable once written: resets append
/// a new epoch and repoint the guild, they never touch old rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildStorage {
    pub guild_id: Snowflake,
    pub storage_id: StorageId,
    pub created_at: DateTime<Utc>,
}

impl GuildStorage {
    /// Create a new epoch record stamped now
    pub fn new(guild_id: Snowflake, storage_id: StorageId) -> Self {
        Self {
            guild_id,
            storage_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_epoch_is_stamped() {
        let before = Utc::now();
        let epoch = GuildStorage::new(Snowflake::new(1), StorageId::generate());
        assert!(epoch.created_at >= before);
        assert_eq!(epoch.guild_id, Snowflake::new(1));
    }
}
