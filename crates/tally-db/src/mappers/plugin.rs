//! Plugin config model mapper

use tally_core::entities::PluginConfig;
use tally_core::value_objects::Snowflake;

use crate::models::PluginConfigModel;

impl From<PluginConfigModel> for PluginConfig {
    fn from(model: PluginConfigModel) -> Self {
        PluginConfig {
            guild_id: Snowflake::new(model.guild_id),
            name: model.name,
            config: model.config,
            updated_at: model.updated_at,
        }
    }
}
