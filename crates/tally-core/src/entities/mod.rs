//! Domain entities - core business objects

mod alert;
mod event;
mod guild;
mod member;
mod payment;
mod plugin;
mod storage;
mod subscription;

pub use alert::{Alert, AlertField, AlertKind, AlertValue, NewAlert};
pub use event::{MemberEvent, MemberEventKind, NewMemberEvent};
pub use guild::{GuildSetting, GuildSettings, SettingValue, DEFAULT_LANGUAGE, DEFAULT_PREFIX};
pub use member::{InviteKind, InviteTotals, LeaderboardEntry, MemberCounters};
pub use payment::{NewPayment, Payment, ProviderStatus, PAYPAL_CANCEL_MARKER, PAYPAL_SIGNUP_MARKER};
pub use plugin::PluginConfig;
pub use storage::GuildStorage;
pub use subscription::{
    classify_premium, GuildPremium, NewSubscription, Subscription, SubscriptionField,
    SubscriptionValue, TRIAL_LABEL,
};
