//! [`ActorEntity`] implementation for [`PickupStore`].

use super::PickupError;
use crate::model::{PickupSlot, PickupStore};
use actor_framework::ActorEntity;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct PickupStoreUpdate {
    pub active: Option<bool>,
    pub pickup_slots: Option<Vec<PickupSlot>>,
}

#[async_trait]
impl ActorEntity for PickupStore {
    type Id = String;
    type Create = PickupStore;
    type Update = PickupStoreUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = PickupError;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn from_create_params(params: PickupStore) -> Result<Self, Self::Error> {
        if params.id.trim().is_empty() || params.name.trim().is_empty() {
            return Err(PickupError::ValidationError(
                "pickup store needs an id and a name".to_string(),
            ));
        }
        Ok(params)
    }

    async fn on_update(&mut self, update: PickupStoreUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(active) = update.active {
            self.active = active;
        }
        if let Some(slots) = update.pickup_slots {
            self.pickup_slots = slots;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}
