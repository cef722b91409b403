//! Plugin config service
//!
//! A guild's plugin configs are cached together as one JSON list. Upserts
//! patch the cached list when it is present (replace-or-append by plugin
//! name); an absent entry is never materialized from a single config.

use tracing::instrument;

use tally_core::entities::PluginConfig;
use tally_core::value_objects::Snowflake;

use crate::cacheops;
use crate::keys;

use super::context::StoreContext;
use super::StoreResult;

/// Plugin config service
pub struct PluginService<'a> {
    ctx: &'a StoreContext,
}

impl<'a> PluginService<'a> {
    /// Create a new PluginService
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// All plugin configs of a guild, cache first
    #[instrument(skip(self))]
    pub async fn list(&self, guild_id: Snowflake) -> StoreResult<Vec<PluginConfig>> {
        let key = keys::plugins(guild_id);

        if let Some(configs) =
            cacheops::read_json::<Vec<PluginConfig>>(self.ctx.cache(), &key).await
        {
            return Ok(configs);
        }

        let configs = self.ctx.plugin_repo().find_by_guild(guild_id).await?;
        cacheops::spawn_fill_json(self.ctx.cache_arc(), key, &configs, None);
        Ok(configs)
    }

    /// One plugin's config; `None` when the plugin has no stored config
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        guild_id: Snowflake,
        name: &str,
    ) -> StoreResult<Option<PluginConfig>> {
        let configs = self.list(guild_id).await?;
        Ok(configs.into_iter().find(|c| c.name == name))
    }

    /// Insert or replace one plugin's config blob
    #[instrument(skip(self, config))]
    pub async fn upsert(
        &self,
        guild_id: Snowflake,
        name: &str,
        config: serde_json::Value,
    ) -> StoreResult<PluginConfig> {
        let entry = PluginConfig::new(guild_id, name, config);
        self.ctx.plugin_repo().upsert(&entry).await?;

        let key = keys::plugins(guild_id);
        let patched = entry.clone();
        cacheops::patch_json_list::<PluginConfig, _>(self.ctx.cache(), &key, move |configs| {
            match configs.iter_mut().find(|c| c.name == patched.name) {
                Some(existing) => *existing = patched,
                None => configs.push(patched),
            }
        })
        .await;

        Ok(entry)
    }
}
