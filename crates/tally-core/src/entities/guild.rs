//! Guild settings entity and its mutable-field allow-list

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::value_objects::{Snowflake, StorageId};

/// Language a guild starts with
pub const DEFAULT_LANGUAGE: &str = "en-US";
/// Command prefix a guild starts with
pub const DEFAULT_PREFIX: &str = "+";

/// Per-guild settings. The row is provisioned lazily: the first settings read
/// for an unknown guild creates it with defaults, together with the guild's
/// first storage epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSettings {
    pub guild_id: Snowflake,
    pub language: String,
    pub prefix: String,
    pub command_channel: Option<Snowflake>,
    pub fake_threshold: Option<i32>,
    /// The storage epoch new invite counters are written against
    pub storage_id: StorageId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GuildSettings {
    /// Create the default settings row for a freshly seen guild
    pub fn with_defaults(guild_id: Snowflake, storage_id: StorageId) -> Self {
        let now = Utc::now();
        Self {
            guild_id,
            language: DEFAULT_LANGUAGE.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            command_channel: None,
            fake_threshold: None,
            storage_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The closed set of guild settings a caller may mutate.
///
/// Anything outside this enum cannot reach a statement: field names are only
/// ever interpolated into SQL after passing through [`GuildSetting::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildSetting {
    Language,
    Prefix,
    CommandChannel,
    FakeThreshold,
}

impl GuildSetting {
    /// All mutable settings
    pub const ALL: [GuildSetting; 4] = [
        Self::Language,
        Self::Prefix,
        Self::CommandChannel,
        Self::FakeThreshold,
    ];

    /// Resolve a caller-supplied field name against the allow-list
    pub fn parse(name: &str) -> Result<Self, StoreError> {
        match name {
            "language" => Ok(Self::Language),
            "prefix" => Ok(Self::Prefix),
            "command_channel" => Ok(Self::CommandChannel),
            "fake_threshold" => Ok(Self::FakeThreshold),
            other => Err(StoreError::unknown_setting("guild", other)),
        }
    }

    /// Column (and cache hash field) this setting maps to
    pub fn column(&self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Prefix => "prefix",
            Self::CommandChannel => "command_channel",
            Self::FakeThreshold => "fake_threshold",
        }
    }

    /// Parse a raw caller value into the type this setting holds
    pub fn parse_value(&self, raw: Option<&str>) -> Result<SettingValue, StoreError> {
        match self {
            Self::Language | Self::Prefix => {
                let text = raw
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| StoreError::invalid_value(self.column(), "<empty>"))?;
                Ok(SettingValue::Text(text.to_string()))
            }
            Self::CommandChannel => match raw {
                None => Ok(SettingValue::OptionalId(None)),
                Some(s) => Snowflake::parse(s)
                    .map(|id| SettingValue::OptionalId(Some(id)))
                    .map_err(|_| StoreError::invalid_value(self.column(), s)),
            },
            Self::FakeThreshold => match raw {
                None => Ok(SettingValue::OptionalInt(None)),
                Some(s) => s
                    .parse::<i32>()
                    .map(|n| SettingValue::OptionalInt(Some(n)))
                    .map_err(|_| StoreError::invalid_value(self.column(), s)),
            },
        }
    }
}

/// A parsed, typed setting value ready to bind into a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    OptionalId(Option<Snowflake>),
    OptionalInt(Option<i32>),
}

impl SettingValue {
    /// Stringified form stored in the cache hash; cleared fields become the
    /// empty string so the hash always carries every field.
    pub fn cache_repr(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::OptionalId(Some(id)) => id.to_string(),
            Self::OptionalInt(Some(n)) => n.to_string(),
            Self::OptionalId(None) | Self::OptionalInt(None) => String::new(),
        }
    }
}
