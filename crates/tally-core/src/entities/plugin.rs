//! Per-guild plugin configuration blobs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Opaque JSON configuration for one plugin of one guild. Upsert semantics:
/// writing the same (guild, name) pair replaces the blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    pub guild_id: Snowflake,
    pub name: String,
    pub config: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl PluginConfig {
    /// Create a config blob stamped now
    pub fn new(guild_id: Snowflake, name: impl Into<String>, config: serde_json::Value) -> Self {
        Self {
            guild_id,
            name: name.into(),
            config,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_roundtrip() {
        let cfg = PluginConfig::new(Snowflake::new(1), "greeter", json!({"channel": "42"}));
        let encoded = serde_json::to_string(&cfg).unwrap();
        let decoded: PluginConfig = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, cfg);
    }
}
