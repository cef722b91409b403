//! Storage epoch model mapper

use tally_core::entities::GuildStorage;
use tally_core::error::StoreError;
use tally_core::value_objects::{Snowflake, StorageId};

use crate::models::GuildStorageModel;

impl TryFrom<GuildStorageModel> for GuildStorage {
    type Error = StoreError;

    fn try_from(model: GuildStorageModel) -> Result<Self, Self::Error> {
        let storage_id = StorageId::parse(&model.storage_id)
            .map_err(|e| StoreError::QueryFailed(format!("guild_storages.storage_id: {e}")))?;
        Ok(GuildStorage {
            guild_id: Snowflake::new(model.guild_id),
            storage_id,
            created_at: model.created_at,
        })
    }
}
