//! Store ports - the interfaces the coordinator drives
//!
//! Repository traits are the DurableStore side; `FastCache` is the cache side.
//! The domain layer defines what it needs, the infrastructure crates provide
//! the implementations.

mod fast_cache;
mod repositories;

pub use fast_cache::{CacheResult, FastCache};
pub use repositories::{
    AlertRepository, BlacklistRepository, GuildSettingsRepository, GuildStorageRepository,
    MemberEventRepository, MemberRepository, PaymentRepository, PluginRepository, RepoResult,
    SubscriptionRepository,
};
