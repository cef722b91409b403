//! Subscription model mapper

use tally_core::entities::Subscription;

use crate::models::SubscriptionModel;

impl From<SubscriptionModel> for Subscription {
    fn from(model: SubscriptionModel) -> Self {
        Subscription {
            id: model.id,
            expires_at: model.expires_at,
            created_at: model.created_at,
            sub_label: model.sub_label,
            guilds_count: model.guilds_count,
            patreon_user_id: model.patreon_user_id,
            cancelled: model.cancelled,
            sub_invalidated: model.sub_invalidated,
        }
    }
}
