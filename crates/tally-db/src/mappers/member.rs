//! Member counter model mappers

use tally_core::entities::{InviteTotals, LeaderboardEntry, MemberCounters};
use tally_core::error::StoreError;
use tally_core::value_objects::{Snowflake, StorageId};

use crate::models::{InviteTotalsModel, LeaderboardRowModel, MemberCountersModel};

impl TryFrom<MemberCountersModel> for MemberCounters {
    type Error = StoreError;

    fn try_from(model: MemberCountersModel) -> Result<Self, Self::Error> {
        let storage_id = StorageId::parse(&model.storage_id)
            .map_err(|e| StoreError::QueryFailed(format!("members.storage_id: {e}")))?;
        Ok(MemberCounters {
            guild_id: Snowflake::new(model.guild_id),
            user_id: Snowflake::new(model.user_id),
            storage_id,
            regular: model.regular,
            leaves: model.leaves,
            bonus: model.bonus,
            fake: model.fake,
        })
    }
}

impl From<LeaderboardRowModel> for LeaderboardEntry {
    fn from(model: LeaderboardRowModel) -> Self {
        LeaderboardEntry {
            user_id: Snowflake::new(model.user_id),
            regular: model.regular,
            leaves: model.leaves,
            bonus: model.bonus,
            fake: model.fake,
            net: model.net,
        }
    }
}

impl From<InviteTotalsModel> for InviteTotals {
    fn from(model: InviteTotalsModel) -> Self {
        InviteTotals {
            regular: model.regular,
            leaves: model.leaves,
            bonus: model.bonus,
            fake: model.fake,
        }
    }
}
