//! Guild settings model mapper

use tally_core::entities::GuildSettings;
use tally_core::error::StoreError;
use tally_core::value_objects::{Snowflake, StorageId};

use crate::models::GuildSettingsModel;

impl TryFrom<GuildSettingsModel> for GuildSettings {
    type Error = StoreError;

    fn try_from(model: GuildSettingsModel) -> Result<Self, Self::Error> {
        let storage_id = StorageId::parse(&model.storage_id)
            .map_err(|e| StoreError::QueryFailed(format!("guilds.storage_id: {e}")))?;
        Ok(GuildSettings {
            guild_id: Snowflake::new(model.guild_id),
            language: model.language,
            prefix: model.prefix,
            command_channel: model.command_channel.map(Snowflake::new),
            fake_threshold: model.fake_threshold,
            storage_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
