//! # Delivery Client
//!
//! High-level API for the Delivery actor and the local [`DeliveryDirectory`] tier.

use crate::delivery_actor::{DeliveryError, DeliveryUpdate};
use crate::model::{DeliverySession, DeliveryStatus};
use crate::repository::DeliveryDirectory;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct DeliveryClient {
    inner: ResourceClient<DeliverySession>,
}

impl DeliveryClient {
    pub fn new(inner: ResourceClient<DeliverySession>) -> Self {
        Self { inner }
    }

    /// Adds or replaces a scheduled run.
    #[instrument(skip(self, session), fields(delivery_id = %session.id))]
    pub async fn schedule(&self, session: DeliverySession) -> Result<String, DeliveryError> {
        debug!("Sending request");
        self.inner.upsert(session).await.map_err(|e| {
            super::entity_error::<DeliveryError>(e).unwrap_or_else(Self::map_error)
        })
    }

    #[instrument(skip(self))]
    pub async fn update_session(
        &self,
        id: String,
        update: DeliveryUpdate,
    ) -> Result<DeliverySession, DeliveryError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(|e| match e {
            FrameworkError::NotFound(id) => DeliveryError::NotFound(id),
            other => super::entity_error::<DeliveryError>(other).unwrap_or_else(Self::map_error),
        })
    }

    /// Stops a run from taking further orders.
    pub async fn close_session(&self, id: String) -> Result<DeliverySession, DeliveryError> {
        let closed = self
            .update_session(
                id,
                DeliveryUpdate {
                    status: Some(DeliveryStatus::Closed),
                    ..Default::default()
                },
            )
            .await?;
        info!(delivery_id = %closed.id, "Delivery session closed");
        Ok(closed)
    }
}

#[async_trait]
impl ActorClient<DeliverySession> for DeliveryClient {
    type Error = DeliveryError;

    fn inner(&self) -> &ResourceClient<DeliverySession> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        DeliveryError::ActorCommunicationError(e.to_string())
    }
}

#[async_trait]
impl DeliveryDirectory for DeliveryClient {
    async fn active_sessions(&self, now: NaiveDateTime) -> Result<Vec<DeliverySession>, DeliveryError> {
        let mut sessions: Vec<DeliverySession> = self
            .list()
            .await?
            .into_iter()
            .filter(|session| session.is_accepting(now))
            .collect();
        sessions.sort_by(|a, b| {
            a.delivery_datetime
                .cmp(&b.delivery_datetime)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(sessions)
    }

    async fn find(&self, id: &str) -> Result<Option<DeliverySession>, DeliveryError> {
        self.get(id.to_string()).await
    }
}
