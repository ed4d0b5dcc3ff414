//! # Pickup Client
//!
//! High-level API for the Pickup actor and the local [`PickupDirectory`] tier.

use crate::model::PickupStore;
use crate::pickup_actor::{PickupError, PickupStoreUpdate};
use crate::repository::PickupDirectory;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct PickupClient {
    inner: ResourceClient<PickupStore>,
}

impl PickupClient {
    pub fn new(inner: ResourceClient<PickupStore>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, store), fields(store_id = %store.id))]
    pub async fn register_store(&self, store: PickupStore) -> Result<String, PickupError> {
        debug!("Sending request");
        self.inner.upsert(store).await.map_err(|e| {
            super::entity_error::<PickupError>(e).unwrap_or_else(Self::map_error)
        })
    }

    #[instrument(skip(self))]
    pub async fn update_store(
        &self,
        id: String,
        update: PickupStoreUpdate,
    ) -> Result<PickupStore, PickupError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(|e| match e {
            FrameworkError::NotFound(id) => PickupError::NotFound(id),
            other => super::entity_error::<PickupError>(other).unwrap_or_else(Self::map_error),
        })
    }
}

#[async_trait]
impl ActorClient<PickupStore> for PickupClient {
    type Error = PickupError;

    fn inner(&self) -> &ResourceClient<PickupStore> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        PickupError::ActorCommunicationError(e.to_string())
    }
}

#[async_trait]
impl PickupDirectory for PickupClient {
    async fn active_stores(&self) -> Result<Vec<PickupStore>, PickupError> {
        let mut stores: Vec<PickupStore> = self
            .list()
            .await?
            .into_iter()
            .filter(|store| store.active)
            .collect();
        stores.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(stores)
    }

    async fn find(&self, id: &str) -> Result<Option<PickupStore>, PickupError> {
        self.get(id.to_string()).await
    }
}
