//! Member invite counters and leaderboard shapes

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::value_objects::{Snowflake, StorageId};

/// The four invite counters tracked per member. Counters only ever move by
/// increments; a reset swaps the storage epoch instead of zeroing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteKind {
    /// Joins attributed to this member's invites
    Regular,
    /// Invited members who later left
    Leaves,
    /// Operator-granted bonus invites
    Bonus,
    /// Joins flagged as fake (self-invites, rejoin churn)
    Fake,
}

impl InviteKind {
    /// All counter kinds
    pub const ALL: [InviteKind; 4] = [Self::Regular, Self::Leaves, Self::Bonus, Self::Fake];

    /// Resolve a caller-supplied counter name
    pub fn parse(name: &str) -> Result<Self, StoreError> {
        match name {
            "regular" => Ok(Self::Regular),
            "leaves" => Ok(Self::Leaves),
            "bonus" => Ok(Self::Bonus),
            "fake" => Ok(Self::Fake),
            other => Err(StoreError::unknown_setting("invite counter", other)),
        }
    }

    /// Column (and cache hash field) this counter maps to
    pub fn column(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Leaves => "leaves",
            Self::Bonus => "bonus",
            Self::Fake => "fake",
        }
    }
}

impl std::fmt::Display for InviteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Invite counters for one member within one storage epoch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberCounters {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub storage_id: StorageId,
    pub regular: i64,
    pub leaves: i64,
    pub bonus: i64,
    pub fake: i64,
}

impl MemberCounters {
    /// Create a zeroed counter row for a member entering the epoch
    pub fn new(guild_id: Snowflake, user_id: Snowflake, storage_id: StorageId) -> Self {
        Self {
            guild_id,
            user_id,
            storage_id,
            regular: 0,
            leaves: 0,
            bonus: 0,
            fake: 0,
        }
    }

    /// Net invites: `regular + bonus - leaves - fake`
    #[inline]
    pub fn net_invites(&self) -> i64 {
        self.regular + self.bonus - self.leaves - self.fake
    }

    /// Apply a counter delta in memory (mirrors what the store does)
    pub fn apply(&mut self, kind: InviteKind, delta: i64) {
        let counter = match kind {
            InviteKind::Regular => &mut self.regular,
            InviteKind::Leaves => &mut self.leaves,
            InviteKind::Bonus => &mut self.bonus,
            InviteKind::Fake => &mut self.fake,
        };
        *counter += delta;
    }
}

/// Summed counters across all members of one epoch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteTotals {
    pub regular: i64,
    pub leaves: i64,
    pub bonus: i64,
    pub fake: i64,
}

impl InviteTotals {
    /// Net invites for the whole epoch
    #[inline]
    pub fn net(&self) -> i64 {
        self.regular + self.bonus - self.leaves - self.fake
    }
}

/// One row of an invite leaderboard, ordered by `net` descending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: Snowflake,
    pub regular: i64,
    pub leaves: i64,
    pub bonus: i64,
    pub fake: i64,
    pub net: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> MemberCounters {
        MemberCounters::new(Snowflake::new(1), Snowflake::new(2), StorageId::generate())
    }

    #[test]
    fn test_net_invites_derivation() {
        let mut m = member();
        m.apply(InviteKind::Regular, 10);
        m.apply(InviteKind::Bonus, 3);
        m.apply(InviteKind::Leaves, 2);
        m.apply(InviteKind::Fake, 1);
        assert_eq!(m.net_invites(), 10);
    }

    #[test]
    fn test_net_invites_may_go_negative() {
        let mut m = member();
        m.apply(InviteKind::Leaves, 4);
        assert_eq!(m.net_invites(), -4);
    }

    #[test]
    fn test_invite_kind_roundtrip() {
        for kind in InviteKind::ALL {
            assert_eq!(InviteKind::parse(kind.column()).unwrap(), kind);
        }
        assert!(InviteKind::parse("boost").is_err());
    }

    #[test]
    fn test_totals_net() {
        let totals = InviteTotals {
            regular: 7,
            leaves: 1,
            bonus: 2,
            fake: 3,
        };
        assert_eq!(totals.net(), 5);
        assert_eq!(InviteTotals::default().net(), 0);
    }
}
