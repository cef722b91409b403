//! Subscription entity, its mutable-field allow-list, and premium classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// `sub_label` value that marks a trial subscription
pub const TRIAL_LABEL: &str = "trial";

/// A premium subscription. Linked to guilds through a join relation; one
/// subscription may cover several guilds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub sub_label: Option<String>,
    pub guilds_count: i32,
    pub patreon_user_id: Option<String>,
    pub cancelled: bool,
    pub sub_invalidated: bool,
}

impl Subscription {
    /// Whether the subscription is live at `now`
    #[inline]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Whether the subscription is a live trial at `now`
    pub fn is_trial(&self, now: DateTime<Utc>) -> bool {
        self.is_active(now) && self.sub_label.as_deref() == Some(TRIAL_LABEL)
    }
}

/// A subscription before the store assigns its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub expires_at: DateTime<Utc>,
    pub sub_label: Option<String>,
    pub guilds_count: i32,
    pub patreon_user_id: Option<String>,
}

/// Premium standing of a guild, computed against wall-clock time at the call.
/// Not stable across calls: a subscription can lapse between two reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildPremium {
    /// No live subscription
    None,
    /// Live subscription carrying the trial label
    Trial { expires_at: DateTime<Utc> },
    /// Live paid subscription
    Premium { expires_at: DateTime<Utc> },
}

/// Classify a guild's premium standing from its linked subscriptions.
/// Trial wins over plain premium only when the trial is the latest-expiring
/// live subscription.
pub fn classify_premium(subscriptions: &[Subscription], now: DateTime<Utc>) -> GuildPremium {
    let best = subscriptions
        .iter()
        .filter(|s| s.is_active(now))
        .max_by_key(|s| s.expires_at);

    match best {
        None => GuildPremium::None,
        Some(sub) if sub.is_trial(now) => GuildPremium::Trial {
            expires_at: sub.expires_at,
        },
        Some(sub) => GuildPremium::Premium {
            expires_at: sub.expires_at,
        },
    }
}

/// The closed set of subscription fields a caller may mutate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionField {
    ExpiresAt,
    SubLabel,
    GuildsCount,
    Cancelled,
    SubInvalidated,
}

impl SubscriptionField {
    /// All mutable fields
    pub const ALL: [SubscriptionField; 5] = [
        Self::ExpiresAt,
        Self::SubLabel,
        Self::GuildsCount,
        Self::Cancelled,
        Self::SubInvalidated,
    ];

    /// Resolve a caller-supplied field name against the allow-list
    pub fn parse(name: &str) -> Result<Self, StoreError> {
        match name {
            "expires_at" => Ok(Self::ExpiresAt),
            "sub_label" => Ok(Self::SubLabel),
            "guilds_count" => Ok(Self::GuildsCount),
            "cancelled" => Ok(Self::Cancelled),
            "sub_invalidated" => Ok(Self::SubInvalidated),
            other => Err(StoreError::unknown_setting("subscription", other)),
        }
    }

    /// Column this field maps to
    pub fn column(&self) -> &'static str {
        match self {
            Self::ExpiresAt => "expires_at",
            Self::SubLabel => "sub_label",
            Self::GuildsCount => "guilds_count",
            Self::Cancelled => "cancelled",
            Self::SubInvalidated => "sub_invalidated",
        }
    }

    /// Parse a raw caller value into the type this field holds
    pub fn parse_value(&self, raw: Option<&str>) -> Result<SubscriptionValue, StoreError> {
        let required = || StoreError::invalid_value(self.column(), "<empty>");
        match self {
            Self::ExpiresAt => {
                let s = raw.ok_or_else(required)?;
                s.parse::<DateTime<Utc>>()
                    .map(SubscriptionValue::Timestamp)
                    .map_err(|_| StoreError::invalid_value(self.column(), s))
            }
            Self::SubLabel => Ok(SubscriptionValue::OptionalText(
                raw.filter(|s| !s.is_empty()).map(str::to_string),
            )),
            Self::GuildsCount => {
                let s = raw.ok_or_else(required)?;
                s.parse::<i32>()
                    .map(SubscriptionValue::Int)
                    .map_err(|_| StoreError::invalid_value(self.column(), s))
            }
            Self::Cancelled | Self::SubInvalidated => {
                let s = raw.ok_or_else(required)?;
                match s {
                    "true" => Ok(SubscriptionValue::Flag(true)),
                    "false" => Ok(SubscriptionValue::Flag(false)),
                    _ => Err(StoreError::invalid_value(self.column(), s)),
                }
            }
        }
    }
}

/// A parsed, typed subscription field value ready to bind into a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionValue {
    Timestamp(DateTime<Utc>),
    OptionalText(Option<String>),
    Int(i32),
    Flag(bool),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sub(id: i64, expires_in: Duration, label: Option<&str>) -> Subscription {
        let now = Utc::now();
        Subscription {
            id,
            expires_at: now + expires_in,
            created_at: now,
            sub_label: label.map(str::to_string),
            guilds_count: 1,
            patreon_user_id: None,
            cancelled: false,
            sub_invalidated: false,
        }
    }

    #[test]
    fn test_active_and_trial() {
        let now = Utc::now();
        assert!(sub(1, Duration::days(7), None).is_active(now));
        assert!(!sub(1, Duration::days(-1), None).is_active(now));
        assert!(sub(1, Duration::days(7), Some(TRIAL_LABEL)).is_trial(now));
        assert!(!sub(1, Duration::days(-1), Some(TRIAL_LABEL)).is_trial(now));
    }

    #[test]
    fn test_classify_no_live_subscription() {
        let now = Utc::now();
        let subs = vec![sub(1, Duration::days(-3), None)];
        assert_eq!(classify_premium(&subs, now), GuildPremium::None);
        assert_eq!(classify_premium(&[], now), GuildPremium::None);
    }

    #[test]
    fn test_classify_prefers_latest_expiring() {
        let now = Utc::now();
        let trial = sub(1, Duration::days(3), Some(TRIAL_LABEL));
        let paid = sub(2, Duration::days(30), None);
        let verdict = classify_premium(&[trial, paid.clone()], now);
        assert_eq!(
            verdict,
            GuildPremium::Premium {
                expires_at: paid.expires_at
            }
        );
    }

    #[test]
    fn test_classify_trial() {
        let now = Utc::now();
        let trial = sub(1, Duration::days(3), Some(TRIAL_LABEL));
        let verdict = classify_premium(std::slice::from_ref(&trial), now);
        assert_eq!(
            verdict,
            GuildPremium::Trial {
                expires_at: trial.expires_at
            }
        );
    }

    #[test]
    fn test_field_allow_list() {
        for field in SubscriptionField::ALL {
            assert_eq!(SubscriptionField::parse(field.column()).unwrap(), field);
        }
        assert!(matches!(
            SubscriptionField::parse("patreon_user_id"),
            Err(StoreError::UnknownSetting { .. })
        ));
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(
            SubscriptionField::GuildsCount.parse_value(Some("4")).unwrap(),
            SubscriptionValue::Int(4)
        );
        assert_eq!(
            SubscriptionField::Cancelled.parse_value(Some("true")).unwrap(),
            SubscriptionValue::Flag(true)
        );
        assert!(SubscriptionField::Cancelled.parse_value(Some("yes")).is_err());
        assert_eq!(
            SubscriptionField::SubLabel.parse_value(None).unwrap(),
            SubscriptionValue::OptionalText(None)
        );
    }
}
