//! Payment model mapper

use tally_core::entities::Payment;

use crate::models::PaymentModel;

impl From<PaymentModel> for Payment {
    fn from(model: PaymentModel) -> Self {
        Payment {
            id: model.id,
            subscription_id: model.subscription_id,
            payment_type: model.payment_type,
            amount_cents: model.amount_cents,
            currency: model.currency,
            created_at: model.created_at,
        }
    }
}
