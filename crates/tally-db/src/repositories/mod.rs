//! Repository implementations
//!
//! PostgreSQL implementations of the ports defined in tally-core. Each
//! repository handles database operations for a specific domain entity.

mod alert;
mod blacklist;
mod error;
mod event;
mod guild_settings;
mod member;
mod payment;
mod plugin;
mod storage;
mod subscription;

pub use alert::PgAlertRepository;
pub use blacklist::PgBlacklistRepository;
pub use event::PgMemberEventRepository;
pub use guild_settings::PgGuildSettingsRepository;
pub use member::PgMemberRepository;
pub use payment::PgPaymentRepository;
pub use plugin::PgPluginRepository;
pub use storage::PgGuildStorageRepository;
pub use subscription::PgSubscriptionRepository;
