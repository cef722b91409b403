//! Member counters and leaderboard service
//!
//! Counters are cached per (guild, epoch, member) as a hash and incremented
//! in lockstep with the database. The increment only patches a hash that is
//! already present; a missing entry is left missing so the next read rebuilds
//! it whole from the database instead of growing from a lone counter.
//!
//! Leaderboards are cached with a short TTL instead of per-write consistency:
//! every invite would otherwise invalidate them. Counter mutations still
//! delete the leaderboard entry proactively, so the TTL is the staleness
//! bound, not the only mechanism.

use std::collections::HashMap;

use futures::future::join_all;
use tokio::join;
use tracing::instrument;

use tally_core::entities::{InviteKind, LeaderboardEntry, MemberCounters};
use tally_core::value_objects::{Snowflake, StorageId};

use crate::cacheops;
use crate::keys;

use super::context::StoreContext;
use super::StoreResult;

/// Member counters service
pub struct MemberService<'a> {
    ctx: &'a StoreContext,
}

impl<'a> MemberService<'a> {
    /// Create a new MemberService
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// Create a zeroed counter row for a member entering the epoch. Members
    /// are created explicitly before their first increment.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
    ) -> StoreResult<MemberCounters> {
        let member = MemberCounters::new(guild_id, user_id, storage_id.clone());
        let key = keys::member(guild_id, storage_id, user_id);
        let hash = counters_to_hash(&member);

        let (db, ()) = join!(
            self.ctx.member_repo().create(&member),
            cacheops::best_effort(
                &key,
                self.ctx.cache().hash_set(&key, &hash),
            ),
        );
        db?;

        Ok(member)
    }

    /// Fetch one member's counters, cache first
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
    ) -> StoreResult<Option<MemberCounters>> {
        let key = keys::member(guild_id, storage_id, user_id);

        if let Some(fields) = cacheops::read_hash(self.ctx.cache(), &key).await {
            if let Some(member) = counters_from_hash(guild_id, storage_id, user_id, &fields) {
                return Ok(Some(member));
            }
        }

        let Some(member) = self
            .ctx
            .member_repo()
            .find(guild_id, storage_id, user_id)
            .await?
        else {
            return Ok(None);
        };

        cacheops::spawn_fill_hash(self.ctx.cache_arc(), key, counters_to_hash(&member));
        Ok(Some(member))
    }

    /// Net invites for one member; `None` when the member has no counter row
    #[instrument(skip(self))]
    pub async fn net_invites(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
    ) -> StoreResult<Option<i64>> {
        Ok(self
            .get(guild_id, storage_id, user_id)
            .await?
            .map(|m| m.net_invites()))
    }

    /// Add a counter delta for one member. The database update, the cache
    /// patch, and the leaderboard invalidation run concurrently; only the
    /// database decides the outcome.
    #[instrument(skip(self))]
    pub async fn add_invites(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
        kind: InviteKind,
        delta: i64,
    ) -> StoreResult<()> {
        let lb_key = keys::leaderboard(guild_id, storage_id);

        let (db, (), ()) = join!(
            self.ctx
                .member_repo()
                .increment(guild_id, storage_id, user_id, kind, delta),
            self.patch_cached_counter(guild_id, storage_id, user_id, kind, delta),
            cacheops::invalidate(self.ctx.cache(), &lb_key),
        );
        db
    }

    /// Credit the same delta to many members: one relational statement, one
    /// cache patch per member. Partial cache failures roll nothing back.
    #[instrument(skip(self, user_ids), fields(users = user_ids.len()))]
    pub async fn add_invites_many(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_ids: &[Snowflake],
        kind: InviteKind,
        delta: i64,
    ) -> StoreResult<u64> {
        let lb_key = keys::leaderboard(guild_id, storage_id);

        let patches = join_all(user_ids.iter().map(|&user_id| {
            self.patch_cached_counter(guild_id, storage_id, user_id, kind, delta)
        }));
        let (db, _, ()) = join!(
            self.ctx
                .member_repo()
                .increment_many(guild_id, storage_id, user_ids, kind, delta),
            patches,
            cacheops::invalidate(self.ctx.cache(), &lb_key),
        );
        db
    }

    /// Leaderboard for an epoch: members with positive net invites, net
    /// descending, optionally truncated. Cached whole (untruncated) under a
    /// short TTL.
    #[instrument(skip(self))]
    pub async fn leaderboard(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        limit: Option<usize>,
    ) -> StoreResult<Vec<LeaderboardEntry>> {
        let key = keys::leaderboard(guild_id, storage_id);

        if let Some(entries) =
            cacheops::read_json::<Vec<LeaderboardEntry>>(self.ctx.cache(), &key).await
        {
            return Ok(truncate(entries, limit));
        }

        let entries = self
            .ctx
            .member_repo()
            .leaderboard(guild_id, storage_id, None)
            .await?;

        cacheops::spawn_fill_json(
            self.ctx.cache_arc(),
            key,
            &entries,
            Some(self.ctx.cache_config().leaderboard_ttl_seconds),
        );
        Ok(truncate(entries, limit))
    }

    /// Patch the cached counter hash, only when it is already present
    async fn patch_cached_counter(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
        kind: InviteKind,
        delta: i64,
    ) {
        let key = keys::member(guild_id, storage_id, user_id);
        if cacheops::read_hash(self.ctx.cache(), &key).await.is_none() {
            return;
        }
        cacheops::best_effort(
            &key,
            self.ctx.cache().hash_increment(&key, kind.column(), delta),
        )
        .await;
    }
}

fn truncate(mut entries: Vec<LeaderboardEntry>, limit: Option<usize>) -> Vec<LeaderboardEntry> {
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}

/// Flatten counters into cache hash fields
fn counters_to_hash(member: &MemberCounters) -> Vec<(&'static str, String)> {
    vec![
        ("regular", member.regular.to_string()),
        ("leaves", member.leaves.to_string()),
        ("bonus", member.bonus.to_string()),
        ("fake", member.fake.to_string()),
    ]
}

/// Rebuild counters from cache hash fields; entries are filled whole, so a
/// missing or unparsable field makes the entry a miss
fn counters_from_hash(
    guild_id: Snowflake,
    storage_id: &StorageId,
    user_id: Snowflake,
    fields: &HashMap<String, String>,
) -> Option<MemberCounters> {
    let counter = |name: &str| fields.get(name)?.parse::<i64>().ok();
    Some(MemberCounters {
        guild_id,
        user_id,
        storage_id: storage_id.clone(),
        regular: counter("regular")?,
        leaves: counter("leaves")?,
        bonus: counter("bonus")?,
        fake: counter("fake")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_hash_roundtrip() {
        let mut member =
            MemberCounters::new(Snowflake::new(1), Snowflake::new(2), StorageId::generate());
        member.regular = 12;
        member.fake = 3;

        let fields: HashMap<String, String> = counters_to_hash(&member)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let rebuilt =
            counters_from_hash(member.guild_id, &member.storage_id, member.user_id, &fields)
                .unwrap();
        assert_eq!(rebuilt, member);
    }

    #[test]
    fn test_partial_counter_hash_is_a_miss() {
        let mut fields = HashMap::new();
        fields.insert("regular".to_string(), "4".to_string());
        assert!(counters_from_hash(
            Snowflake::new(1),
            &StorageId::generate(),
            Snowflake::new(2),
            &fields
        )
        .is_none());
    }

    #[test]
    fn test_truncate() {
        let entry = |user: i64, net: i64| LeaderboardEntry {
            user_id: Snowflake::new(user),
            regular: net,
            leaves: 0,
            bonus: 0,
            fake: 0,
            net,
        };
        let entries = vec![entry(1, 5), entry(2, 3), entry(3, 1)];
        assert_eq!(truncate(entries.clone(), Some(2)).len(), 2);
        assert_eq!(truncate(entries, None).len(), 3);
    }
}
