//! Alert rules and their mutable-field allow-list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::value_objects::Snowflake;

/// Which member movement an alert watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Join,
    Leave,
}

impl AlertKind {
    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Leave => "leave",
        }
    }

    /// Parse the stored string form
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        match s {
            "join" => Ok(Self::Join),
            "leave" => Ok(Self::Leave),
            other => Err(StoreError::invalid_value("alert_type", other)),
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-guild alert rule: post `message` to `channel_id` when the watched
/// movement happens and the inviter has reached `invite_count` net invites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message: String,
    pub invite_count: i32,
    pub alert_type: AlertKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An alert rule before the store assigns its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message: String,
    pub invite_count: i32,
    pub alert_type: AlertKind,
}

/// The closed set of alert fields a caller may mutate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertField {
    ChannelId,
    Message,
    InviteCount,
    AlertType,
}

impl AlertField {
    /// All mutable fields
    pub const ALL: [AlertField; 4] = [
        Self::ChannelId,
        Self::Message,
        Self::InviteCount,
        Self::AlertType,
    ];

    /// Resolve a caller-supplied field name against the allow-list
    pub fn parse(name: &str) -> Result<Self, StoreError> {
        match name {
            "channel_id" => Ok(Self::ChannelId),
            "message" => Ok(Self::Message),
            "invite_count" => Ok(Self::InviteCount),
            "alert_type" => Ok(Self::AlertType),
            other => Err(StoreError::unknown_setting("alert", other)),
        }
    }

    /// Column this field maps to
    pub fn column(&self) -> &'static str {
        match self {
            Self::ChannelId => "channel_id",
            Self::Message => "message",
            Self::InviteCount => "invite_count",
            Self::AlertType => "alert_type",
        }
    }

    /// Parse a raw caller value into the type this field holds
    pub fn parse_value(&self, raw: &str) -> Result<AlertValue, StoreError> {
        match self {
            Self::ChannelId => Snowflake::parse(raw)
                .map(AlertValue::Id)
                .map_err(|_| StoreError::invalid_value(self.column(), raw)),
            Self::Message => {
                if raw.is_empty() {
                    Err(StoreError::invalid_value(self.column(), "<empty>"))
                } else {
                    Ok(AlertValue::Text(raw.to_string()))
                }
            }
            Self::InviteCount => raw
                .parse::<i32>()
                .map(AlertValue::Int)
                .map_err(|_| StoreError::invalid_value(self.column(), raw)),
            Self::AlertType => AlertKind::parse(raw).map(AlertValue::Kind),
        }
    }
}

/// A parsed, typed alert field value ready to bind into a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertValue {
    Id(Snowflake),
    Text(String),
    Int(i32),
    Kind(AlertKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_allow_list() {
        for field in AlertField::ALL {
            assert_eq!(AlertField::parse(field.column()).unwrap(), field);
        }
        assert!(matches!(
            AlertField::parse("guild_id"),
            Err(StoreError::UnknownSetting { .. })
        ));
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(
            AlertField::ChannelId.parse_value("42").unwrap(),
            AlertValue::Id(Snowflake::new(42))
        );
        assert_eq!(
            AlertField::InviteCount.parse_value("10").unwrap(),
            AlertValue::Int(10)
        );
        assert_eq!(
            AlertField::AlertType.parse_value("leave").unwrap(),
            AlertValue::Kind(AlertKind::Leave)
        );
        assert!(AlertField::AlertType.parse_value("ban").is_err());
        assert!(AlertField::Message.parse_value("").is_err());
    }

    #[test]
    fn test_kind_serde_form() {
        let json = serde_json::to_string(&AlertKind::Join).unwrap();
        assert_eq!(json, "\"join\"");
    }
}
