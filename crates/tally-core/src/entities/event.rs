//! Member event log entries

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::value_objects::{Snowflake, StorageId};

/// What happened to a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberEventKind {
    Join,
    Leave,
}

impl MemberEventKind {
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
            other => Err(StoreError::QueryFailed(format!(
                "unknown member event kind: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for MemberEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of a join/leave and its invite attribution.
/// Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEvent {
    pub id: i64,
    pub guild_id: Snowflake,
    /// Epoch that was current when the event happened
    pub storage_id: StorageId,
    /// The member who joined or left
    pub user_id: Snowflake,
    /// Who invited them, when attribution succeeded
    pub inviter_id: Option<Snowflake>,
    pub kind: MemberEventKind,
    pub created_at: DateTime<Utc>,
}

/// A member event before the store assigns its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMemberEvent {
    pub guild_id: Snowflake,
    pub storage_id: StorageId,
    pub user_id: Snowflake,
    pub inviter_id: Option<Snowflake>,
    pub kind: MemberEventKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        assert_eq!(MemberEventKind::parse("join").unwrap(), MemberEventKind::Join);
        assert_eq!(
            MemberEventKind::parse("leave").unwrap(),
            MemberEventKind::Leave
        );
        assert!(MemberEventKind::parse("ban").is_err());
    }
}
