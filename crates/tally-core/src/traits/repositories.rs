//! Repository traits (ports) - the DurableStore capability set
//!
//! The relational store is the source of truth; every trait here surfaces its
//! failures unchanged. Missing rows come back as `None`, empty vectors, or
//! zeroed aggregates, never as errors — a failed lookup must stay
//! distinguishable from a lookup that found nothing.

use async_trait::async_trait;

use crate::entities::{
    Alert, AlertField, AlertValue, GuildSetting, GuildSettings, GuildStorage, InviteKind,
    InviteTotals, LeaderboardEntry, MemberCounters, MemberEvent, NewAlert, NewMemberEvent,
    NewPayment, NewSubscription, Payment, PluginConfig, SettingValue, Subscription,
    SubscriptionField, SubscriptionValue,
};
use crate::error::StoreError;
use crate::value_objects::{Snowflake, StorageId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, StoreError>;

// ============================================================================
// Guild settings
// ============================================================================

#[async_trait]
pub trait GuildSettingsRepository: Send + Sync {
    /// Find a guild's settings row
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>>;

    /// Insert a freshly provisioned settings row
    async fn insert(&self, settings: &GuildSettings) -> RepoResult<()>;

    /// Update one allow-listed setting
    async fn update_setting(
        &self,
        guild_id: Snowflake,
        setting: GuildSetting,
        value: &SettingValue,
    ) -> RepoResult<()>;

    /// Flip the guild's current-storage pointer in a single statement.
    /// Its acknowledgment is what makes a rotation count as having happened.
    async fn set_storage_pointer(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
    ) -> RepoResult<()>;
}

// ============================================================================
// Storage epochs
// ============================================================================

#[async_trait]
pub trait GuildStorageRepository: Send + Sync {
    /// Append an epoch record
    async fn insert(&self, storage: &GuildStorage) -> RepoResult<()>;

    /// Most recently created epoch whose id differs from `current`.
    /// `None` means the guild has no other epoch — nothing to restore.
    async fn find_latest_other(
        &self,
        guild_id: Snowflake,
        current: &StorageId,
    ) -> RepoResult<Option<GuildStorage>>;

    /// All epochs of a guild, newest first
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<GuildStorage>>;
}

// ============================================================================
// Member counters
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find one member's counters within an epoch
    async fn find(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberCounters>>;

    /// Create a zeroed counter row (no-op if the member already exists)
    async fn create(&self, member: &MemberCounters) -> RepoResult<()>;

    /// Increment one counter for one member
    async fn increment(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
        kind: InviteKind,
        delta: i64,
    ) -> RepoResult<()>;

    /// Increment one counter for many members with a single statement,
    /// returning the number of rows touched
    async fn increment_many(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_ids: &[Snowflake],
        kind: InviteKind,
        delta: i64,
    ) -> RepoResult<u64>;

    /// Sum all counters across an epoch; zero rows sum to zero totals
    async fn totals(&self, guild_id: Snowflake, storage_id: &StorageId)
        -> RepoResult<InviteTotals>;

    /// Members of an epoch with positive net invites, net descending,
    /// blacklisted users excluded
    async fn leaderboard(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        limit: Option<i64>,
    ) -> RepoResult<Vec<LeaderboardEntry>>;
}

// ============================================================================
// Member events
// ============================================================================

#[async_trait]
pub trait MemberEventRepository: Send + Sync {
    /// Append an event, returning it with its generated id
    async fn append(&self, event: &NewMemberEvent) -> RepoResult<MemberEvent>;

    /// Events where the given user joined or left, newest first
    async fn find_by_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Vec<MemberEvent>>;

    /// Events attributed to the given inviter, newest first
    async fn find_by_inviter(
        &self,
        guild_id: Snowflake,
        inviter_id: Snowflake,
    ) -> RepoResult<Vec<MemberEvent>>;
}

// ============================================================================
// Subscriptions & payments
// ============================================================================

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// All subscriptions linked to a guild, newest first
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Subscription>>;

    /// Insert a subscription and link it to the guild,
    /// returning it with its generated id
    async fn create(
        &self,
        guild_id: Snowflake,
        subscription: &NewSubscription,
    ) -> RepoResult<Subscription>;

    /// Link an existing subscription to another guild
    async fn link_guild(&self, subscription_id: i64, guild_id: Snowflake) -> RepoResult<()>;

    /// Update one allow-listed field
    async fn update_field(
        &self,
        subscription_id: i64,
        field: SubscriptionField,
        value: &SubscriptionValue,
    ) -> RepoResult<()>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Append a payment, returning it with its generated id
    async fn create(&self, payment: &NewPayment) -> RepoResult<Payment>;

    /// Payments of one subscription, oldest first
    async fn find_by_subscription(&self, subscription_id: i64) -> RepoResult<Vec<Payment>>;

    /// Payments across every subscription linked to a guild, oldest first
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Payment>>;
}

// ============================================================================
// Alerts
// ============================================================================

#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// All alert rules of a guild
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Alert>>;

    /// Insert an alert rule, returning it with its generated id
    async fn create(&self, alert: &NewAlert) -> RepoResult<Alert>;

    /// Update one allow-listed field
    async fn update_field(
        &self,
        alert_id: i64,
        field: AlertField,
        value: &AlertValue,
    ) -> RepoResult<()>;

    /// Delete an alert rule; deleting an unknown id is not an error
    async fn delete(&self, alert_id: i64) -> RepoResult<()>;
}

// ============================================================================
// Plugin configs
// ============================================================================

#[async_trait]
pub trait PluginRepository: Send + Sync {
    /// All plugin configs of a guild
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<PluginConfig>>;

    /// Insert or replace the config blob for (guild, plugin)
    async fn upsert(&self, config: &PluginConfig) -> RepoResult<()>;
}

// ============================================================================
// Blacklist
// ============================================================================

#[async_trait]
pub trait BlacklistRepository: Send + Sync {
    /// Users excluded from a guild's leaderboards
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Add a user (no-op if already present)
    async fn add(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    /// Remove a user (no-op if absent)
    async fn remove(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;
}
