//! [`ActorEntity`] implementation for [`DeliverySession`].

use super::DeliveryError;
use crate::model::{DeliverySession, DeliveryStatus};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Admin-side changes to a scheduled run.
#[derive(Debug, Clone, Default)]
pub struct DeliveryUpdate {
    pub status: Option<DeliveryStatus>,
    pub cutoff_time: Option<NaiveDateTime>,
}

#[async_trait]
impl ActorEntity for DeliverySession {
    type Id = String;
    type Create = DeliverySession;
    type Update = DeliveryUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = DeliveryError;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn from_create_params(params: DeliverySession) -> Result<Self, Self::Error> {
        if params.id.trim().is_empty() {
            return Err(DeliveryError::ValidationError(
                "delivery session id is empty".to_string(),
            ));
        }
        Ok(params)
    }

    async fn on_update(&mut self, update: DeliveryUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(cutoff) = update.cutoff_time {
            self.cutoff_time = cutoff;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}
