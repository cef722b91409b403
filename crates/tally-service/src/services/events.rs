//! Member event service
//!
//! Append-only join/leave log. Not cached: events are written once and read
//! rarely, always straight from the database.

use tracing::instrument;

use tally_core::entities::{MemberEvent, NewMemberEvent};
use tally_core::value_objects::Snowflake;

use super::context::StoreContext;
use super::StoreResult;

/// Member event service
pub struct MemberEventService<'a> {
    ctx: &'a StoreContext,
}

impl<'a> MemberEventService<'a> {
    /// Create a new MemberEventService
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// Append an event to the log
    #[instrument(skip(self, event))]
    pub async fn record(&self, event: NewMemberEvent) -> StoreResult<MemberEvent> {
        self.ctx.event_repo().append(&event).await
    }

    /// Events where the given user was the one joining or leaving
    #[instrument(skip(self))]
    pub async fn for_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> StoreResult<Vec<MemberEvent>> {
        self.ctx.event_repo().find_by_member(guild_id, user_id).await
    }

    /// Events attributed to the given inviter
    #[instrument(skip(self))]
    pub async fn for_inviter(
        &self,
        guild_id: Snowflake,
        inviter_id: Snowflake,
    ) -> StoreResult<Vec<MemberEvent>> {
        self.ctx
            .event_repo()
            .find_by_inviter(guild_id, inviter_id)
            .await
    }
}
