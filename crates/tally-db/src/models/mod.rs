//! Database models - SQLx-compatible structs for PostgreSQL tables

mod alert;
mod event;
mod guild;
mod member;
mod payment;
mod plugin;
mod storage;
mod subscription;

pub use alert::AlertModel;
pub use event::MemberEventModel;
pub use guild::GuildSettingsModel;
pub use member::{InviteTotalsModel, LeaderboardRowModel, MemberCountersModel};
pub use payment::PaymentModel;
pub use plugin::PluginConfigModel;
pub use storage::GuildStorageModel;
pub use subscription::SubscriptionModel;
