//! Payment records and the provider-status heuristic

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `payment_type` prefix stamped on PayPal-style signups
pub const PAYPAL_SIGNUP_MARKER: &str = "paypal_signup";
/// `payment_type` prefix stamped on PayPal-style cancellations
pub const PAYPAL_CANCEL_MARKER: &str = "paypal_cancel";

/// Immutable record of one monetary transaction against a subscription.
/// The `payment_type` tag classifies provider and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub subscription_id: i64,
    pub payment_type: String,
    pub amount_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Whether this payment marks a provider-managed signup
    #[inline]
    pub fn is_signup(&self) -> bool {
        self.payment_type.starts_with(PAYPAL_SIGNUP_MARKER)
    }

    /// Whether this payment marks a provider-managed cancellation
    #[inline]
    pub fn is_cancellation(&self) -> bool {
        self.payment_type.starts_with(PAYPAL_CANCEL_MARKER)
    }
}

/// A payment before the store assigns its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub subscription_id: i64,
    pub payment_type: String,
    pub amount_cents: i64,
    pub currency: String,
}

/// Where a guild's subscription is managed, derived from its payment log.
///
/// This is a heuristic over append-only data, recomputed per call rather than
/// stored: a guild counts as externally managed once any signup-marker payment
/// exists, and as cancelled while signup markers strictly outnumber
/// cancellation markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderStatus {
    /// Any linked payment carries the signup marker
    pub externally_managed: bool,
    /// Signup-marker payments strictly outnumber cancellation markers
    pub cancelled: bool,
}

impl ProviderStatus {
    /// Derive the status from every payment linked to a guild's subscriptions
    pub fn from_payments(payments: &[Payment]) -> Self {
        let signups = payments.iter().filter(|p| p.is_signup()).count();
        let cancels = payments.iter().filter(|p| p.is_cancellation()).count();
        Self {
            externally_managed: signups > 0,
            cancelled: signups > cancels,
        }
    }
}
