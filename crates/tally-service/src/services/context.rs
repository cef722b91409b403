//! Store context - dependency container for the entity services
//!
//! Holds the repository ports, the cache port, and cache behavior knobs.
//! Services borrow the context instead of owning dependencies.

use std::sync::Arc;

use tally_cache::NoopCache;
use tally_common::CacheConfig;
use tally_core::traits::{
    AlertRepository, BlacklistRepository, FastCache, GuildSettingsRepository,
    GuildStorageRepository, MemberEventRepository, MemberRepository, PaymentRepository,
    PluginRepository, SubscriptionRepository,
};
use tally_db::{
    PgAlertRepository, PgBlacklistRepository, PgGuildSettingsRepository,
    PgGuildStorageRepository, PgMemberEventRepository, PgMemberRepository, PgPaymentRepository,
    PgPluginRepository, PgPool, PgSubscriptionRepository,
};

/// Dependency container passed to every service
#[derive(Clone)]
pub struct StoreContext {
    settings_repo: Arc<dyn GuildSettingsRepository>,
    storage_repo: Arc<dyn GuildStorageRepository>,
    member_repo: Arc<dyn MemberRepository>,
    event_repo: Arc<dyn MemberEventRepository>,
    subscription_repo: Arc<dyn SubscriptionRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    alert_repo: Arc<dyn AlertRepository>,
    plugin_repo: Arc<dyn PluginRepository>,
    blacklist_repo: Arc<dyn BlacklistRepository>,
    cache: Arc<dyn FastCache>,
    cache_config: CacheConfig,
}

impl StoreContext {
    /// Wire every repository against one PostgreSQL pool.
    ///
    /// Pass [`NoopCache`] (via `StoreContextBuilder`) or disable the cache in
    /// `CacheConfig` to run without Redis.
    pub fn postgres(pool: PgPool, cache: Arc<dyn FastCache>, cache_config: CacheConfig) -> Self {
        let cache: Arc<dyn FastCache> = if cache_config.enabled {
            cache
        } else {
            Arc::new(NoopCache::new())
        };
        Self {
            settings_repo: Arc::new(PgGuildSettingsRepository::new(pool.clone())),
            storage_repo: Arc::new(PgGuildStorageRepository::new(pool.clone())),
            member_repo: Arc::new(PgMemberRepository::new(pool.clone())),
            event_repo: Arc::new(PgMemberEventRepository::new(pool.clone())),
            subscription_repo: Arc::new(PgSubscriptionRepository::new(pool.clone())),
            payment_repo: Arc::new(PgPaymentRepository::new(pool.clone())),
            alert_repo: Arc::new(PgAlertRepository::new(pool.clone())),
            plugin_repo: Arc::new(PgPluginRepository::new(pool.clone())),
            blacklist_repo: Arc::new(PgBlacklistRepository::new(pool)),
            cache,
            cache_config,
        }
    }

    // === Repositories ===

    /// Get the guild settings repository
    pub fn settings_repo(&self) -> &dyn GuildSettingsRepository {
        self.settings_repo.as_ref()
    }

    /// Get the storage epoch repository
    pub fn storage_repo(&self) -> &dyn GuildStorageRepository {
        self.storage_repo.as_ref()
    }

    /// Get the member counters repository
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the member event repository
    pub fn event_repo(&self) -> &dyn MemberEventRepository {
        self.event_repo.as_ref()
    }

    /// Get the subscription repository
    pub fn subscription_repo(&self) -> &dyn SubscriptionRepository {
        self.subscription_repo.as_ref()
    }

    /// Get the payment repository
    pub fn payment_repo(&self) -> &dyn PaymentRepository {
        self.payment_repo.as_ref()
    }

    /// Get the alert repository
    pub fn alert_repo(&self) -> &dyn AlertRepository {
        self.alert_repo.as_ref()
    }

    /// Get the plugin config repository
    pub fn plugin_repo(&self) -> &dyn PluginRepository {
        self.plugin_repo.as_ref()
    }

    /// Get the blacklist repository
    pub fn blacklist_repo(&self) -> &dyn BlacklistRepository {
        self.blacklist_repo.as_ref()
    }

    // === Cache ===

    /// Get the cache port
    pub fn cache(&self) -> &dyn FastCache {
        self.cache.as_ref()
    }

    /// Clone the cache handle for a detached fill task
    pub fn cache_arc(&self) -> Arc<dyn FastCache> {
        Arc::clone(&self.cache)
    }

    /// Get the cache behavior knobs
    pub fn cache_config(&self) -> &CacheConfig {
        &self.cache_config
    }
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext")
            .field("repositories", &"...")
            .field("cache_config", &self.cache_config)
            .finish()
    }
}

/// Builder for assembling a StoreContext from individual ports, used when
/// swapping in alternative implementations (tests, cacheless runs)
pub struct StoreContextBuilder {
    settings_repo: Option<Arc<dyn GuildSettingsRepository>>,
    storage_repo: Option<Arc<dyn GuildStorageRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    event_repo: Option<Arc<dyn MemberEventRepository>>,
    subscription_repo: Option<Arc<dyn SubscriptionRepository>>,
    payment_repo: Option<Arc<dyn PaymentRepository>>,
    alert_repo: Option<Arc<dyn AlertRepository>>,
    plugin_repo: Option<Arc<dyn PluginRepository>>,
    blacklist_repo: Option<Arc<dyn BlacklistRepository>>,
    cache: Arc<dyn FastCache>,
    cache_config: CacheConfig,
}

impl StoreContextBuilder {
    pub fn new() -> Self {
        Self {
            settings_repo: None,
            storage_repo: None,
            member_repo: None,
            event_repo: None,
            subscription_repo: None,
            payment_repo: None,
            alert_repo: None,
            plugin_repo: None,
            blacklist_repo: None,
            cache: Arc::new(NoopCache::new()),
            cache_config: CacheConfig::default(),
        }
    }

    pub fn settings_repo(mut self, repo: Arc<dyn GuildSettingsRepository>) -> Self {
        self.settings_repo = Some(repo);
        self
    }

    pub fn storage_repo(mut self, repo: Arc<dyn GuildStorageRepository>) -> Self {
        self.storage_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn event_repo(mut self, repo: Arc<dyn MemberEventRepository>) -> Self {
        self.event_repo = Some(repo);
        self
    }

    pub fn subscription_repo(mut self, repo: Arc<dyn SubscriptionRepository>) -> Self {
        self.subscription_repo = Some(repo);
        self
    }

    pub fn payment_repo(mut self, repo: Arc<dyn PaymentRepository>) -> Self {
        self.payment_repo = Some(repo);
        self
    }

    pub fn alert_repo(mut self, repo: Arc<dyn AlertRepository>) -> Self {
        self.alert_repo = Some(repo);
        self
    }

    pub fn plugin_repo(mut self, repo: Arc<dyn PluginRepository>) -> Self {
        self.plugin_repo = Some(repo);
        self
    }

    pub fn blacklist_repo(mut self, repo: Arc<dyn BlacklistRepository>) -> Self {
        self.blacklist_repo = Some(repo);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn FastCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Build the StoreContext
    ///
    /// # Panics
    /// Panics if a repository was not provided; wiring is a startup concern,
    /// not a runtime one.
    pub fn build(self) -> StoreContext {
        StoreContext {
            settings_repo: self.settings_repo.expect("settings_repo is required"),
            storage_repo: self.storage_repo.expect("storage_repo is required"),
            member_repo: self.member_repo.expect("member_repo is required"),
            event_repo: self.event_repo.expect("event_repo is required"),
            subscription_repo: self.subscription_repo.expect("subscription_repo is required"),
            payment_repo: self.payment_repo.expect("payment_repo is required"),
            alert_repo: self.alert_repo.expect("alert_repo is required"),
            plugin_repo: self.plugin_repo.expect("plugin_repo is required"),
            blacklist_repo: self.blacklist_repo.expect("blacklist_repo is required"),
            cache: self.cache,
            cache_config: self.cache_config,
        }
    }
}

impl Default for StoreContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
