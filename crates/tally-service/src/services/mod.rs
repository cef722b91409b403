//! Entity services - the operations callers use
//!
//! Each service borrows the shared [`StoreContext`] and implements the
//! cache-aside read/write policy for one entity family.

mod alerts;
mod blacklist;
mod context;
mod events;
mod guild_settings;
mod members;
mod plugins;
mod rotation;
mod subscriptions;

pub use alerts::AlertService;
pub use blacklist::BlacklistService;
pub use context::{StoreContext, StoreContextBuilder};
pub use events::MemberEventService;
pub use guild_settings::GuildSettingsService;
pub use members::MemberService;
pub use plugins::PluginService;
pub use rotation::StorageRotationService;
pub use subscriptions::SubscriptionService;

use tally_core::error::StoreError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
