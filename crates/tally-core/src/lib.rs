//! # tally-core
//!
//! Domain layer containing entities, value objects, the error taxonomy, and the
//! store ports (repository traits plus the `FastCache` trait). This crate has
//! zero dependencies on infrastructure (database, Redis, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Alert, AlertField, AlertKind, GuildPremium, GuildSetting, GuildSettings, GuildStorage,
    InviteKind, InviteTotals, LeaderboardEntry, MemberCounters, MemberEvent, MemberEventKind,
    NewAlert, NewMemberEvent, NewPayment, NewSubscription, Payment, PluginConfig, ProviderStatus,
    SettingValue, Subscription, SubscriptionField,
};
pub use error::{CacheError, StoreError};
pub use traits::{
    AlertRepository, BlacklistRepository, CacheResult, FastCache, GuildSettingsRepository,
    GuildStorageRepository, MemberEventRepository, MemberRepository, PaymentRepository,
    PluginRepository, RepoResult, SubscriptionRepository,
};
pub use value_objects::{Snowflake, SnowflakeParseError, StorageId, StorageIdParseError};
