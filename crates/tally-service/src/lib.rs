//! # tally-service
//!
//! The cache-aside persistence coordinator and the entity services built on
//! it. Reads consult the cache first and fall back to PostgreSQL on a miss,
//! repopulating the cache off the critical path; writes go to both stores,
//! with the database as the only arbiter of success. Storage rotation — the
//! resettable invite-counter mechanic — lives in
//! [`services::StorageRotationService`].

mod cacheops;
pub mod keys;
pub mod services;

pub use services::{
    AlertService, BlacklistService, GuildSettingsService, MemberEventService, MemberService,
    PluginService, StorageRotationService, StoreContext, StoreContextBuilder, StoreResult,
    SubscriptionService,
};
