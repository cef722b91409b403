//! Guild settings service
//!
//! Settings are cached as a hash so single fields can be written through
//! without rewriting the entry. A hash with any field present is a hit; the
//! entry is only ever filled whole, so partial hashes (a field write that
//! raced an eviction) fail decoding and fall back to the database.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::join;
use tracing::{info, instrument};

use tally_core::entities::{GuildSetting, GuildSettings, GuildStorage};
use tally_core::value_objects::{Snowflake, StorageId};

use crate::cacheops;
use crate::keys;

use super::context::StoreContext;
use super::StoreResult;

/// Guild settings service
pub struct GuildSettingsService<'a> {
    ctx: &'a StoreContext,
}

impl<'a> GuildSettingsService<'a> {
    /// Create a new GuildSettingsService
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// Fetch a guild's settings, provisioning the row (and the guild's first
    /// storage epoch) if the guild has never been seen.
    #[instrument(skip(self))]
    pub async fn get(&self, guild_id: Snowflake) -> StoreResult<GuildSettings> {
        let key = keys::guild_settings(guild_id);

        if let Some(fields) = cacheops::read_hash(self.ctx.cache(), &key).await {
            if let Some(settings) = settings_from_hash(guild_id, &fields) {
                return Ok(settings);
            }
        }

        if let Some(settings) = self.ctx.settings_repo().find(guild_id).await? {
            cacheops::spawn_fill_hash(self.ctx.cache_arc(), key, settings_to_hash(&settings));
            return Ok(settings);
        }

        self.provision(guild_id, key).await
    }

    /// Update one allow-listed setting. The field name is validated before any
    /// store is touched; both stores are then written concurrently and only
    /// the database outcome decides success.
    #[instrument(skip(self, raw_value))]
    pub async fn update(
        &self,
        guild_id: Snowflake,
        name: &str,
        raw_value: Option<&str>,
    ) -> StoreResult<()> {
        let setting = GuildSetting::parse(name)?;
        let value = setting.parse_value(raw_value)?;

        let key = keys::guild_settings(guild_id);
        let fields = [(setting.column(), value.cache_repr())];
        let (db, ()) = join!(
            self.ctx.settings_repo().update_setting(guild_id, setting, &value),
            cacheops::best_effort(&key, self.ctx.cache().hash_set(&key, &fields)),
        );
        db
    }

    /// First sighting of a guild: write the default settings row and its first
    /// epoch in the same logical operation.
    async fn provision(&self, guild_id: Snowflake, key: String) -> StoreResult<GuildSettings> {
        let fresh = GuildSettings::with_defaults(guild_id, StorageId::generate());
        self.ctx.settings_repo().insert(&fresh).await?;

        // Re-read so a lost provisioning race yields the winner's row, then
        // append that row's epoch (idempotently) rather than our candidate's.
        let settings = match self.ctx.settings_repo().find(guild_id).await? {
            Some(settings) => settings,
            None => fresh,
        };
        self.ctx
            .storage_repo()
            .insert(&GuildStorage::new(guild_id, settings.storage_id.clone()))
            .await?;

        info!(guild_id = %guild_id, storage_id = %settings.storage_id, "provisioned guild");

        cacheops::spawn_fill_hash(self.ctx.cache_arc(), key, settings_to_hash(&settings));
        Ok(settings)
    }
}

/// Flatten settings into cache hash fields. Cleared optionals are stored as
/// empty strings so the filled entry always carries every field.
fn settings_to_hash(settings: &GuildSettings) -> Vec<(&'static str, String)> {
    vec![
        ("language", settings.language.clone()),
        ("prefix", settings.prefix.clone()),
        (
            "command_channel",
            settings
                .command_channel
                .map(|id| id.to_string())
                .unwrap_or_default(),
        ),
        (
            "fake_threshold",
            settings
                .fake_threshold
                .map(|n| n.to_string())
                .unwrap_or_default(),
        ),
        ("storage_id", settings.storage_id.to_string()),
        ("created_at", settings.created_at.to_rfc3339()),
        ("updated_at", settings.updated_at.to_rfc3339()),
    ]
}

/// Rebuild settings from cache hash fields; any missing or unparsable field
/// makes the entry a miss
fn settings_from_hash(
    guild_id: Snowflake,
    fields: &HashMap<String, String>,
) -> Option<GuildSettings> {
    let timestamp = |name: &str| -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(fields.get(name)?)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    };

    let command_channel = match fields.get("command_channel")?.as_str() {
        "" => None,
        raw => Some(Snowflake::parse(raw).ok()?),
    };
    let fake_threshold = match fields.get("fake_threshold")?.as_str() {
        "" => None,
        raw => Some(raw.parse::<i32>().ok()?),
    };

    Some(GuildSettings {
        guild_id,
        language: fields.get("language")?.clone(),
        prefix: fields.get("prefix")?.clone(),
        command_channel,
        fake_threshold,
        storage_id: StorageId::parse(fields.get("storage_id")?).ok()?,
        created_at: timestamp("created_at")?,
        updated_at: timestamp("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GuildSettings {
        GuildSettings::with_defaults(Snowflake::new(5), StorageId::generate())
    }

    #[test]
    fn test_hash_roundtrip() {
        let mut settings = sample();
        settings.command_channel = Some(Snowflake::new(77));
        settings.fake_threshold = Some(2);

        let fields: HashMap<String, String> = settings_to_hash(&settings)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let rebuilt = settings_from_hash(settings.guild_id, &fields).unwrap();
        assert_eq!(rebuilt.language, settings.language);
        assert_eq!(rebuilt.prefix, settings.prefix);
        assert_eq!(rebuilt.command_channel, settings.command_channel);
        assert_eq!(rebuilt.fake_threshold, settings.fake_threshold);
        assert_eq!(rebuilt.storage_id, settings.storage_id);
    }

    #[test]
    fn test_hash_roundtrip_with_cleared_optionals() {
        let settings = sample();
        let fields: HashMap<String, String> = settings_to_hash(&settings)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let rebuilt = settings_from_hash(settings.guild_id, &fields).unwrap();
        assert_eq!(rebuilt.command_channel, None);
        assert_eq!(rebuilt.fake_threshold, None);
    }

    #[test]
    fn test_partial_hash_is_a_miss() {
        let mut fields = HashMap::new();
        fields.insert("language".to_string(), "en-US".to_string());
        assert!(settings_from_hash(Snowflake::new(5), &fields).is_none());
    }
}
