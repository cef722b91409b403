//! Blacklist service
//!
//! Users excluded from a guild's leaderboards, cached as a set of ids. The
//! cache port has no set-remove, so removals invalidate the key wholesale and
//! the next read rebuilds it. An empty cached set is indistinguishable from
//! an absent key, which makes empty-blacklist guilds permanent misses; that
//! read is a single indexed scan, so the miss is cheap.

use tokio::join;
use tracing::instrument;

use tally_core::value_objects::Snowflake;

use crate::cacheops;
use crate::keys;

use super::context::StoreContext;
use super::StoreResult;

/// Blacklist service
pub struct BlacklistService<'a> {
    ctx: &'a StoreContext,
}

impl<'a> BlacklistService<'a> {
    /// Create a new BlacklistService
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// All blacklisted users of a guild, cache first
    #[instrument(skip(self))]
    pub async fn list(&self, guild_id: Snowflake) -> StoreResult<Vec<Snowflake>> {
        let key = keys::blacklist(guild_id);

        if let Some(users) = self.read_cached(&key).await {
            return Ok(users);
        }

        let users = self.ctx.blacklist_repo().find_by_guild(guild_id).await?;
        if !users.is_empty() {
            cacheops::spawn_fill_set(
                self.ctx.cache_arc(),
                key,
                users.iter().map(Snowflake::to_string).collect(),
            );
        }
        Ok(users)
    }

    /// Whether a user is excluded from the guild's leaderboards
    #[instrument(skip(self))]
    pub async fn contains(&self, guild_id: Snowflake, user_id: Snowflake) -> StoreResult<bool> {
        Ok(self.list(guild_id).await?.contains(&user_id))
    }

    /// Blacklist a user. The cached set is patched only when already present.
    #[instrument(skip(self))]
    pub async fn add(&self, guild_id: Snowflake, user_id: Snowflake) -> StoreResult<()> {
        let key = keys::blacklist(guild_id);

        let (db, ()) = join!(
            self.ctx.blacklist_repo().add(guild_id, user_id),
            self.patch_cached(&key, user_id),
        );
        db
    }

    /// Remove a user from the blacklist; invalidates the cached set
    #[instrument(skip(self))]
    pub async fn remove(&self, guild_id: Snowflake, user_id: Snowflake) -> StoreResult<()> {
        let key = keys::blacklist(guild_id);

        let (db, ()) = join!(
            self.ctx.blacklist_repo().remove(guild_id, user_id),
            cacheops::invalidate(self.ctx.cache(), &key),
        );
        db
    }

    /// Decode the cached set; an empty or unparsable set is a miss
    async fn read_cached(&self, key: &str) -> Option<Vec<Snowflake>> {
        let members = match self.ctx.cache().set_members(key).await {
            Ok(members) if members.is_empty() => return None,
            Ok(members) => members,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache read failed; treating as miss");
                return None;
            }
        };
        members
            .iter()
            .map(|raw| Snowflake::parse(raw).ok())
            .collect()
    }

    /// Add the id to the cached set, only when the set already exists
    async fn patch_cached(&self, key: &str, user_id: Snowflake) {
        match self.ctx.cache().set_members(key).await {
            Ok(members) if !members.is_empty() => {
                cacheops::best_effort(key, self.ctx.cache().set_add(key, &user_id.to_string()))
                    .await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache read failed; skipping patch");
            }
        }
    }
}
