//! Storage rotation service - invite reset and restore
//!
//! Resetting a guild's invite counters never deletes anything: a fresh epoch
//! id is generated, the guild's current-storage pointer is flipped to it, and
//! the old epoch's rows stay behind, readable and restorable.
//!
//! The pointer flip is a single database statement and the only step whose
//! ordering matters: the rotation has happened exactly when that statement is
//! acknowledged. The cached pointer is updated best-effort afterwards, so a
//! concurrent settings read may briefly see the old epoch from cache.

use tracing::{info, instrument};

use tally_core::entities::{GuildStorage, InviteTotals};
use tally_core::value_objects::{Snowflake, StorageId};

use crate::cacheops;
use crate::keys;

use super::context::StoreContext;
use super::StoreResult;

/// Storage rotation service
pub struct StorageRotationService<'a> {
    ctx: &'a StoreContext,
}

impl<'a> StorageRotationService<'a> {
    /// Create a new StorageRotationService
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// Zero a guild's leaderboard by rotating to a fresh epoch. Returns the
    /// new epoch id; counters recorded under older epochs are untouched.
    #[instrument(skip(self))]
    pub async fn reset(&self, guild_id: Snowflake) -> StoreResult<StorageId> {
        let storage_id = StorageId::generate();

        self.ctx
            .settings_repo()
            .set_storage_pointer(guild_id, &storage_id)
            .await?;
        self.update_cached_pointer(guild_id, &storage_id).await;
        self.ctx
            .storage_repo()
            .insert(&GuildStorage::new(guild_id, storage_id.clone()))
            .await?;

        info!(guild_id = %guild_id, storage_id = %storage_id, "rotated invite storage");

        Ok(storage_id)
    }

    /// Point the guild back at an existing epoch. Pointer reassignment only:
    /// no epoch is created and none is deleted, so restoring is itself
    /// reversible.
    #[instrument(skip(self))]
    pub async fn restore(&self, guild_id: Snowflake, target: &StorageId) -> StoreResult<()> {
        self.ctx
            .settings_repo()
            .set_storage_pointer(guild_id, target)
            .await?;
        self.update_cached_pointer(guild_id, target).await;

        info!(guild_id = %guild_id, storage_id = %target, "restored invite storage");

        Ok(())
    }

    /// Undo a reset: restore to the most recently created epoch other than
    /// `current`. Returns `None` when no such epoch exists — nothing to
    /// restore, not an error.
    #[instrument(skip(self))]
    pub async fn restore_previous(
        &self,
        guild_id: Snowflake,
        current: &StorageId,
    ) -> StoreResult<Option<StorageId>> {
        let Some(previous) = self
            .ctx
            .storage_repo()
            .find_latest_other(guild_id, current)
            .await?
        else {
            return Ok(None);
        };

        self.restore(guild_id, &previous.storage_id).await?;
        Ok(Some(previous.storage_id))
    }

    /// Aggregate counters of the most recent epoch other than `current`,
    /// typically read out just before a reset. `None` means the guild has no
    /// previous epoch — distinct from a previous epoch that sums to zero.
    #[instrument(skip(self))]
    pub async fn count_previous(
        &self,
        guild_id: Snowflake,
        current: &StorageId,
    ) -> StoreResult<Option<InviteTotals>> {
        let Some(previous) = self
            .ctx
            .storage_repo()
            .find_latest_other(guild_id, current)
            .await?
        else {
            return Ok(None);
        };

        let totals = self
            .ctx
            .member_repo()
            .totals(guild_id, &previous.storage_id)
            .await?;
        Ok(Some(totals))
    }

    /// Every epoch the guild has ever had, newest first
    #[instrument(skip(self))]
    pub async fn history(&self, guild_id: Snowflake) -> StoreResult<Vec<GuildStorage>> {
        self.ctx.storage_repo().find_by_guild(guild_id).await
    }

    /// Repoint the cached settings entry at the new epoch. Best-effort: a
    /// failure leaves a stale pointer in cache until the next miss or write.
    async fn update_cached_pointer(&self, guild_id: Snowflake, storage_id: &StorageId) {
        let key = keys::guild_settings(guild_id);
        let fields = [("storage_id", storage_id.to_string())];
        cacheops::best_effort(&key, self.ctx.cache().hash_set(&key, &fields)).await;
    }
}
