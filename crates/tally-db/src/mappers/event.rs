//! Member event model mapper

use tally_core::entities::{MemberEvent, MemberEventKind};
use tally_core::error::StoreError;
use tally_core::value_objects::{Snowflake, StorageId};

use crate::models::MemberEventModel;

impl TryFrom<MemberEventModel> for MemberEvent {
    type Error = StoreError;

    fn try_from(model: MemberEventModel) -> Result<Self, Self::Error> {
        let storage_id = StorageId::parse(&model.storage_id)
            .map_err(|e| StoreError::QueryFailed(format!("member_events.storage_id: {e}")))?;
        Ok(MemberEvent {
            id: model.id,
            guild_id: Snowflake::new(model.guild_id),
            storage_id,
            user_id: Snowflake::new(model.user_id),
            inviter_id: model.inviter_id.map(Snowflake::new),
            kind: MemberEventKind::parse(&model.kind)?,
            created_at: model.created_at,
        })
    }
}
