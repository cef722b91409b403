//! Shared test fixtures: an in-memory implementation of every repository port
//! plus helpers for wiring a StoreContext against it.
//!
//! The mock counts mutating calls so tests can assert that rejected
//! operations (unknown setting names) performed zero store writes.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use tally_cache::MemoryCache;
use tally_common::CacheConfig;
use tally_core::entities::{
    Alert, AlertField, AlertValue, GuildSetting, GuildSettings, GuildStorage, InviteKind,
    InviteTotals, LeaderboardEntry, MemberCounters, MemberEvent, NewAlert, NewMemberEvent,
    NewPayment, NewSubscription, Payment, PluginConfig, SettingValue, Subscription,
    SubscriptionField, SubscriptionValue,
};
use tally_core::traits::{
    AlertRepository, BlacklistRepository, GuildSettingsRepository, GuildStorageRepository,
    MemberEventRepository, MemberRepository, PaymentRepository, PluginRepository, RepoResult,
    SubscriptionRepository,
};
use tally_core::value_objects::{Snowflake, StorageId};
use tally_core::StoreError;
use tally_service::{StoreContext, StoreContextBuilder};

#[derive(Default)]
struct State {
    guilds: HashMap<i64, GuildSettings>,
    epochs: Vec<GuildStorage>,
    members: HashMap<(i64, String, i64), MemberCounters>,
    events: Vec<MemberEvent>,
    next_event_id: i64,
    subscriptions: HashMap<i64, Subscription>,
    next_subscription_id: i64,
    guild_subs: HashSet<(i64, i64)>,
    payments: Vec<Payment>,
    next_payment_id: i64,
    alerts: Vec<Alert>,
    next_alert_id: i64,
    plugins: HashMap<(i64, String), PluginConfig>,
    blacklist: HashSet<(i64, i64)>,
    writes: usize,
}

/// In-memory store implementing every repository port
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().expect("store lock poisoned");
        f(&mut state)
    }

    /// Number of mutating repository calls made so far
    pub fn write_count(&self) -> usize {
        self.with(|s| s.writes)
    }

    /// Number of epochs recorded for a guild
    pub fn epoch_count(&self, guild_id: Snowflake) -> usize {
        self.with(|s| {
            s.epochs
                .iter()
                .filter(|e| e.guild_id == guild_id)
                .count()
        })
    }

    /// Counter row straight out of the backing map
    pub fn raw_member(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
    ) -> Option<MemberCounters> {
        self.with(|s| {
            s.members
                .get(&(
                    guild_id.into_inner(),
                    storage_id.to_string(),
                    user_id.into_inner(),
                ))
                .cloned()
        })
    }
}

#[async_trait]
impl GuildSettingsRepository for MemoryStore {
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>> {
        Ok(self.with(|s| s.guilds.get(&guild_id.into_inner()).cloned()))
    }

    async fn insert(&self, settings: &GuildSettings) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            s.guilds
                .entry(settings.guild_id.into_inner())
                .or_insert_with(|| settings.clone());
        });
        Ok(())
    }

    async fn update_setting(
        &self,
        guild_id: Snowflake,
        setting: GuildSetting,
        value: &SettingValue,
    ) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            if let Some(guild) = s.guilds.get_mut(&guild_id.into_inner()) {
                match (setting, value) {
                    (GuildSetting::Language, SettingValue::Text(text)) => {
                        guild.language = text.clone();
                    }
                    (GuildSetting::Prefix, SettingValue::Text(text)) => {
                        guild.prefix = text.clone();
                    }
                    (GuildSetting::CommandChannel, SettingValue::OptionalId(id)) => {
                        guild.command_channel = *id;
                    }
                    (GuildSetting::FakeThreshold, SettingValue::OptionalInt(n)) => {
                        guild.fake_threshold = *n;
                    }
                    _ => {}
                }
                guild.updated_at = Utc::now();
            }
        });
        Ok(())
    }

    async fn set_storage_pointer(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
    ) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            match s.guilds.get_mut(&guild_id.into_inner()) {
                Some(guild) => {
                    guild.storage_id = storage_id.clone();
                    guild.updated_at = Utc::now();
                    Ok(())
                }
                None => Err(StoreError::QueryFailed(format!(
                    "guild {guild_id} has no settings row to repoint"
                ))),
            }
        })
    }
}

#[async_trait]
impl GuildStorageRepository for MemoryStore {
    async fn insert(&self, storage: &GuildStorage) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            let exists = s.epochs.iter().any(|e| {
                e.guild_id == storage.guild_id && e.storage_id == storage.storage_id
            });
            if !exists {
                s.epochs.push(storage.clone());
            }
        });
        Ok(())
    }

    async fn find_latest_other(
        &self,
        guild_id: Snowflake,
        current: &StorageId,
    ) -> RepoResult<Option<GuildStorage>> {
        Ok(self.with(|s| {
            s.epochs
                .iter()
                .enumerate()
                .filter(|(_, e)| e.guild_id == guild_id && e.storage_id != *current)
                .max_by_key(|(idx, e)| (e.created_at, *idx))
                .map(|(_, e)| e.clone())
        }))
    }

    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<GuildStorage>> {
        Ok(self.with(|s| {
            let mut epochs: Vec<_> = s
                .epochs
                .iter()
                .filter(|e| e.guild_id == guild_id)
                .cloned()
                .collect();
            epochs.reverse();
            epochs
        }))
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn find(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberCounters>> {
        Ok(self.raw_member(guild_id, storage_id, user_id))
    }

    async fn create(&self, member: &MemberCounters) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            s.members
                .entry((
                    member.guild_id.into_inner(),
                    member.storage_id.to_string(),
                    member.user_id.into_inner(),
                ))
                .or_insert_with(|| member.clone());
        });
        Ok(())
    }

    async fn increment(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_id: Snowflake,
        kind: InviteKind,
        delta: i64,
    ) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            if let Some(member) = s.members.get_mut(&(
                guild_id.into_inner(),
                storage_id.to_string(),
                user_id.into_inner(),
            )) {
                member.apply(kind, delta);
            }
        });
        Ok(())
    }

    async fn increment_many(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        user_ids: &[Snowflake],
        kind: InviteKind,
        delta: i64,
    ) -> RepoResult<u64> {
        Ok(self.with(|s| {
            s.writes += 1;
            let mut touched = 0;
            for user_id in user_ids {
                if let Some(member) = s.members.get_mut(&(
                    guild_id.into_inner(),
                    storage_id.to_string(),
                    user_id.into_inner(),
                )) {
                    member.apply(kind, delta);
                    touched += 1;
                }
            }
            touched
        }))
    }

    async fn totals(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
    ) -> RepoResult<InviteTotals> {
        Ok(self.with(|s| {
            let mut totals = InviteTotals::default();
            for member in s.members.values() {
                if member.guild_id == guild_id && member.storage_id == *storage_id {
                    totals.regular += member.regular;
                    totals.leaves += member.leaves;
                    totals.bonus += member.bonus;
                    totals.fake += member.fake;
                }
            }
            totals
        }))
    }

    async fn leaderboard(
        &self,
        guild_id: Snowflake,
        storage_id: &StorageId,
        limit: Option<i64>,
    ) -> RepoResult<Vec<LeaderboardEntry>> {
        Ok(self.with(|s| {
            let mut entries: Vec<LeaderboardEntry> = s
                .members
                .values()
                .filter(|m| {
                    m.guild_id == guild_id
                        && m.storage_id == *storage_id
                        && m.net_invites() > 0
                        && !s
                            .blacklist
                            .contains(&(guild_id.into_inner(), m.user_id.into_inner()))
                })
                .map(|m| LeaderboardEntry {
                    user_id: m.user_id,
                    regular: m.regular,
                    leaves: m.leaves,
                    bonus: m.bonus,
                    fake: m.fake,
                    net: m.net_invites(),
                })
                .collect();
            entries.sort_by(|a, b| b.net.cmp(&a.net).then(a.user_id.cmp(&b.user_id)));
            if let Some(limit) = limit {
                entries.truncate(limit as usize);
            }
            entries
        }))
    }
}

#[async_trait]
impl MemberEventRepository for MemoryStore {
    async fn append(&self, event: &NewMemberEvent) -> RepoResult<MemberEvent> {
        Ok(self.with(|s| {
            s.writes += 1;
            s.next_event_id += 1;
            let stored = MemberEvent {
                id: s.next_event_id,
                guild_id: event.guild_id,
                storage_id: event.storage_id.clone(),
                user_id: event.user_id,
                inviter_id: event.inviter_id,
                kind: event.kind,
                created_at: Utc::now(),
            };
            s.events.push(stored.clone());
            stored
        }))
    }

    async fn find_by_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Vec<MemberEvent>> {
        Ok(self.with(|s| {
            let mut events: Vec<_> = s
                .events
                .iter()
                .filter(|e| e.guild_id == guild_id && e.user_id == user_id)
                .cloned()
                .collect();
            events.reverse();
            events
        }))
    }

    async fn find_by_inviter(
        &self,
        guild_id: Snowflake,
        inviter_id: Snowflake,
    ) -> RepoResult<Vec<MemberEvent>> {
        Ok(self.with(|s| {
            let mut events: Vec<_> = s
                .events
                .iter()
                .filter(|e| e.guild_id == guild_id && e.inviter_id == Some(inviter_id))
                .cloned()
                .collect();
            events.reverse();
            events
        }))
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Subscription>> {
        Ok(self.with(|s| {
            let mut subs: Vec<_> = s
                .guild_subs
                .iter()
                .filter(|(g, _)| *g == guild_id.into_inner())
                .filter_map(|(_, sub_id)| s.subscriptions.get(sub_id).cloned())
                .collect();
            subs.sort_by(|a, b| b.id.cmp(&a.id));
            subs
        }))
    }

    async fn create(
        &self,
        guild_id: Snowflake,
        subscription: &NewSubscription,
    ) -> RepoResult<Subscription> {
        Ok(self.with(|s| {
            s.writes += 1;
            s.next_subscription_id += 1;
            let stored = Subscription {
                id: s.next_subscription_id,
                expires_at: subscription.expires_at,
                created_at: Utc::now(),
                sub_label: subscription.sub_label.clone(),
                guilds_count: subscription.guilds_count,
                patreon_user_id: subscription.patreon_user_id.clone(),
                cancelled: false,
                sub_invalidated: false,
            };
            s.subscriptions.insert(stored.id, stored.clone());
            s.guild_subs.insert((guild_id.into_inner(), stored.id));
            stored
        }))
    }

    async fn link_guild(&self, subscription_id: i64, guild_id: Snowflake) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            s.guild_subs.insert((guild_id.into_inner(), subscription_id));
        });
        Ok(())
    }

    async fn update_field(
        &self,
        subscription_id: i64,
        field: SubscriptionField,
        value: &SubscriptionValue,
    ) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            if let Some(sub) = s.subscriptions.get_mut(&subscription_id) {
                match (field, value) {
                    (SubscriptionField::ExpiresAt, SubscriptionValue::Timestamp(ts)) => {
                        sub.expires_at = *ts;
                    }
                    (SubscriptionField::SubLabel, SubscriptionValue::OptionalText(text)) => {
                        sub.sub_label = text.clone();
                    }
                    (SubscriptionField::GuildsCount, SubscriptionValue::Int(n)) => {
                        sub.guilds_count = *n;
                    }
                    (SubscriptionField::Cancelled, SubscriptionValue::Flag(b)) => {
                        sub.cancelled = *b;
                    }
                    (SubscriptionField::SubInvalidated, SubscriptionValue::Flag(b)) => {
                        sub.sub_invalidated = *b;
                    }
                    _ => {}
                }
            }
        });
        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn create(&self, payment: &NewPayment) -> RepoResult<Payment> {
        Ok(self.with(|s| {
            s.writes += 1;
            s.next_payment_id += 1;
            let stored = Payment {
                id: s.next_payment_id,
                subscription_id: payment.subscription_id,
                payment_type: payment.payment_type.clone(),
                amount_cents: payment.amount_cents,
                currency: payment.currency.clone(),
                created_at: Utc::now(),
            };
            s.payments.push(stored.clone());
            stored
        }))
    }

    async fn find_by_subscription(&self, subscription_id: i64) -> RepoResult<Vec<Payment>> {
        Ok(self.with(|s| {
            s.payments
                .iter()
                .filter(|p| p.subscription_id == subscription_id)
                .cloned()
                .collect()
        }))
    }

    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Payment>> {
        Ok(self.with(|s| {
            s.payments
                .iter()
                .filter(|p| {
                    s.guild_subs
                        .contains(&(guild_id.into_inner(), p.subscription_id))
                })
                .cloned()
                .collect()
        }))
    }
}

#[async_trait]
impl AlertRepository for MemoryStore {
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Alert>> {
        Ok(self.with(|s| {
            s.alerts
                .iter()
                .filter(|a| a.guild_id == guild_id)
                .cloned()
                .collect()
        }))
    }

    async fn create(&self, alert: &NewAlert) -> RepoResult<Alert> {
        Ok(self.with(|s| {
            s.writes += 1;
            s.next_alert_id += 1;
            let now = Utc::now();
            let stored = Alert {
                id: s.next_alert_id,
                guild_id: alert.guild_id,
                channel_id: alert.channel_id,
                message: alert.message.clone(),
                invite_count: alert.invite_count,
                alert_type: alert.alert_type,
                created_at: now,
                updated_at: now,
            };
            s.alerts.push(stored.clone());
            stored
        }))
    }

    async fn update_field(
        &self,
        alert_id: i64,
        field: AlertField,
        value: &AlertValue,
    ) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            if let Some(alert) = s.alerts.iter_mut().find(|a| a.id == alert_id) {
                match (field, value) {
                    (AlertField::ChannelId, AlertValue::Id(id)) => alert.channel_id = *id,
                    (AlertField::Message, AlertValue::Text(text)) => {
                        alert.message = text.clone();
                    }
                    (AlertField::InviteCount, AlertValue::Int(n)) => alert.invite_count = *n,
                    (AlertField::AlertType, AlertValue::Kind(kind)) => alert.alert_type = *kind,
                    _ => {}
                }
                alert.updated_at = Utc::now();
            }
        });
        Ok(())
    }

    async fn delete(&self, alert_id: i64) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            s.alerts.retain(|a| a.id != alert_id);
        });
        Ok(())
    }
}

#[async_trait]
impl PluginRepository for MemoryStore {
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<PluginConfig>> {
        Ok(self.with(|s| {
            let mut configs: Vec<_> = s
                .plugins
                .values()
                .filter(|c| c.guild_id == guild_id)
                .cloned()
                .collect();
            configs.sort_by(|a, b| a.name.cmp(&b.name));
            configs
        }))
    }

    async fn upsert(&self, config: &PluginConfig) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            s.plugins.insert(
                (config.guild_id.into_inner(), config.name.clone()),
                config.clone(),
            );
        });
        Ok(())
    }
}

#[async_trait]
impl BlacklistRepository for MemoryStore {
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self.with(|s| {
            let mut users: Vec<_> = s
                .blacklist
                .iter()
                .filter(|(g, _)| *g == guild_id.into_inner())
                .map(|(_, u)| Snowflake::new(*u))
                .collect();
            users.sort();
            users
        }))
    }

    async fn add(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            s.blacklist
                .insert((guild_id.into_inner(), user_id.into_inner()));
        });
        Ok(())
    }

    async fn remove(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        self.with(|s| {
            s.writes += 1;
            s.blacklist
                .remove(&(guild_id.into_inner(), user_id.into_inner()));
        });
        Ok(())
    }
}

/// Wire a context against one in-memory store and cache
pub fn context(store: &Arc<MemoryStore>, cache: &Arc<MemoryCache>) -> StoreContext {
    context_with_cache_config(store, cache, CacheConfig::default())
}

/// Wire a context with custom cache knobs (e.g. a zero leaderboard TTL)
pub fn context_with_cache_config(
    store: &Arc<MemoryStore>,
    cache: &Arc<MemoryCache>,
    cache_config: CacheConfig,
) -> StoreContext {
    StoreContextBuilder::new()
        .settings_repo(store.clone())
        .storage_repo(store.clone())
        .member_repo(store.clone())
        .event_repo(store.clone())
        .subscription_repo(store.clone())
        .payment_repo(store.clone())
        .alert_repo(store.clone())
        .plugin_repo(store.clone())
        .blacklist_repo(store.clone())
        .cache(cache.clone())
        .cache_config(cache_config)
        .build()
}

/// Let detached cache-fill tasks run to completion
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
