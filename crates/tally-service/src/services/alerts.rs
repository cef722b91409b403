//! Alert rule service
//!
//! Alerts use the simpler consistency strategy: every mutation invalidates
//! the guild's cached list wholesale. Rules change rarely and are small, so a
//! forced re-read costs little and can never leave desynchronized partial
//! data behind.

use tracing::instrument;

use tally_core::entities::{Alert, AlertField, NewAlert};
use tally_core::value_objects::Snowflake;

use crate::cacheops;
use crate::keys;

use super::context::StoreContext;
use super::StoreResult;

/// Alert rule service
pub struct AlertService<'a> {
    ctx: &'a StoreContext,
}

impl<'a> AlertService<'a> {
    /// Create a new AlertService
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// All alert rules of a guild, cache first
    #[instrument(skip(self))]
    pub async fn list(&self, guild_id: Snowflake) -> StoreResult<Vec<Alert>> {
        let key = keys::alerts(guild_id);

        if let Some(alerts) = cacheops::read_json::<Vec<Alert>>(self.ctx.cache(), &key).await {
            return Ok(alerts);
        }

        let alerts = self.ctx.alert_repo().find_by_guild(guild_id).await?;
        cacheops::spawn_fill_json(self.ctx.cache_arc(), key, &alerts, None);
        Ok(alerts)
    }

    /// Create an alert rule
    #[instrument(skip(self, alert))]
    pub async fn create(&self, alert: NewAlert) -> StoreResult<Alert> {
        let guild_id = alert.guild_id;
        let created = self.ctx.alert_repo().create(&alert).await?;
        cacheops::invalidate(self.ctx.cache(), &keys::alerts(guild_id)).await;
        Ok(created)
    }

    /// Update one allow-listed alert field
    #[instrument(skip(self, raw_value))]
    pub async fn update_field(
        &self,
        guild_id: Snowflake,
        alert_id: i64,
        name: &str,
        raw_value: &str,
    ) -> StoreResult<()> {
        let field = AlertField::parse(name)?;
        let value = field.parse_value(raw_value)?;

        self.ctx
            .alert_repo()
            .update_field(alert_id, field, &value)
            .await?;
        cacheops::invalidate(self.ctx.cache(), &keys::alerts(guild_id)).await;
        Ok(())
    }

    /// Delete an alert rule
    #[instrument(skip(self))]
    pub async fn delete(&self, guild_id: Snowflake, alert_id: i64) -> StoreResult<()> {
        self.ctx.alert_repo().delete(alert_id).await?;
        cacheops::invalidate(self.ctx.cache(), &keys::alerts(guild_id)).await;
        Ok(())
    }
}
