//! # User Client
//!
//! High-level API for the User actor and the local [`UserDirectory`] tier.

use crate::model::CustomerProfile;
use crate::repository::UserDirectory;
use crate::user_actor::UserError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<CustomerProfile>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<CustomerProfile>) -> Self {
        Self { inner }
    }

    /// Stores the profile, replacing any earlier one for the same user.
    #[instrument(skip(self, profile), fields(user_id = profile.user_id))]
    pub async fn save_profile(&self, profile: CustomerProfile) -> Result<i64, UserError> {
        debug!("Sending request");
        self.inner.upsert(profile).await.map_err(|e| {
            super::entity_error::<UserError>(e).unwrap_or_else(Self::map_error)
        })
    }
}

#[async_trait]
impl ActorClient<CustomerProfile> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<CustomerProfile> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        UserError::ActorCommunicationError(e.to_string())
    }
}

#[async_trait]
impl UserDirectory for UserClient {
    async fn find(&self, user_id: i64) -> Result<Option<CustomerProfile>, UserError> {
        self.get(user_id).await
    }

    async fn save(&self, profile: CustomerProfile) -> Result<(), UserError> {
        self.save_profile(profile).await.map(|_| ())
    }
}
