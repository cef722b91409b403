//! Subscription and payment service
//!
//! The subscription list is cached per guild as a JSON string. Appends patch
//! the cached list when it is present; field edits are structural and
//! invalidate the entry wholesale, forcing the next read back to the
//! database. Premium standing and provider status are derived at call time,
//! never stored.

use chrono::Utc;
use tracing::instrument;

use tally_core::entities::{
    classify_premium, GuildPremium, NewPayment, NewSubscription, Payment, ProviderStatus,
    Subscription, SubscriptionField,
};
use tally_core::value_objects::Snowflake;

use crate::cacheops;
use crate::keys;

use super::context::StoreContext;
use super::StoreResult;

/// Subscription service
pub struct SubscriptionService<'a> {
    ctx: &'a StoreContext,
}

impl<'a> SubscriptionService<'a> {
    /// Create a new SubscriptionService
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// All subscriptions linked to a guild, cache first. A cached empty list
    /// is a valid hit; only an absent key goes to the database.
    #[instrument(skip(self))]
    pub async fn list(&self, guild_id: Snowflake) -> StoreResult<Vec<Subscription>> {
        let key = keys::subscriptions(guild_id);

        if let Some(subs) = cacheops::read_json::<Vec<Subscription>>(self.ctx.cache(), &key).await
        {
            return Ok(subs);
        }

        let subs = self.ctx.subscription_repo().find_by_guild(guild_id).await?;
        cacheops::spawn_fill_json(self.ctx.cache_arc(), key, &subs, None);
        Ok(subs)
    }

    /// Create a subscription linked to the guild. The cached list is patched
    /// only when present; an absent entry is left for the next read to fill.
    #[instrument(skip(self, subscription))]
    pub async fn create(
        &self,
        guild_id: Snowflake,
        subscription: NewSubscription,
    ) -> StoreResult<Subscription> {
        let created = self
            .ctx
            .subscription_repo()
            .create(guild_id, &subscription)
            .await?;

        let key = keys::subscriptions(guild_id);
        let patched = created.clone();
        cacheops::patch_json_list::<Subscription, _>(self.ctx.cache(), &key, move |subs| {
            subs.insert(0, patched);
        })
        .await;

        Ok(created)
    }

    /// Link an existing subscription to another guild
    #[instrument(skip(self))]
    pub async fn link(&self, subscription_id: i64, guild_id: Snowflake) -> StoreResult<()> {
        self.ctx
            .subscription_repo()
            .link_guild(subscription_id, guild_id)
            .await?;
        cacheops::invalidate(self.ctx.cache(), &keys::subscriptions(guild_id)).await;
        Ok(())
    }

    /// Update one allow-listed subscription field. Structural edit: the
    /// guild's cached list is invalidated wholesale rather than patched.
    #[instrument(skip(self, raw_value))]
    pub async fn update_field(
        &self,
        guild_id: Snowflake,
        subscription_id: i64,
        name: &str,
        raw_value: Option<&str>,
    ) -> StoreResult<()> {
        let field = SubscriptionField::parse(name)?;
        let value = field.parse_value(raw_value)?;

        self.ctx
            .subscription_repo()
            .update_field(subscription_id, field, &value)
            .await?;
        cacheops::invalidate(self.ctx.cache(), &keys::subscriptions(guild_id)).await;
        Ok(())
    }

    /// Premium standing of a guild at this instant
    #[instrument(skip(self))]
    pub async fn premium(&self, guild_id: Snowflake) -> StoreResult<GuildPremium> {
        let subs = self.list(guild_id).await?;
        Ok(classify_premium(&subs, Utc::now()))
    }

    /// Provider heuristic over the guild's full payment log
    #[instrument(skip(self))]
    pub async fn provider_status(&self, guild_id: Snowflake) -> StoreResult<ProviderStatus> {
        let payments = self.ctx.payment_repo().find_by_guild(guild_id).await?;
        Ok(ProviderStatus::from_payments(&payments))
    }

    /// Append a payment record
    #[instrument(skip(self, payment))]
    pub async fn record_payment(&self, payment: NewPayment) -> StoreResult<Payment> {
        self.ctx.payment_repo().create(&payment).await
    }

    /// Payments of one subscription, oldest first
    #[instrument(skip(self))]
    pub async fn payments(&self, subscription_id: i64) -> StoreResult<Vec<Payment>> {
        self.ctx
            .payment_repo()
            .find_by_subscription(subscription_id)
            .await
    }
}
