//! Alert model mapper

use tally_core::entities::{Alert, AlertKind};
use tally_core::error::StoreError;
use tally_core::value_objects::Snowflake;

use crate::models::AlertModel;

impl TryFrom<AlertModel> for Alert {
    type Error = StoreError;

    fn try_from(model: AlertModel) -> Result<Self, Self::Error> {
        Ok(Alert {
            id: model.id,
            guild_id: Snowflake::new(model.guild_id),
            channel_id: Snowflake::new(model.channel_id),
            message: model.message,
            invite_count: model.invite_count,
            alert_type: AlertKind::parse(&model.alert_type)
                .map_err(|e| StoreError::QueryFailed(format!("alerts.alert_type: {e}")))?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
