//! Primary-then-fallback composition of two repository tiers.
//!
//! Every call probes the primary first. A failed probe or a failed call moves
//! that call to the fallback; the primary is tried again on the next call.

use super::{DeliveryDirectory, PickupDirectory, UserDirectory};
use crate::delivery_actor::DeliveryError;
use crate::model::{CustomerProfile, DeliverySession, PickupStore};
use crate::pickup_actor::PickupError;
use crate::user_actor::UserError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Tiered<T: ?Sized> {
    primary: Arc<T>,
    fallback: Arc<T>,
}

impl<T: ?Sized> Tiered<T> {
    pub fn new(primary: Arc<T>, fallback: Arc<T>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl UserDirectory for Tiered<dyn UserDirectory> {
    /// A profile missing from the primary is still looked up locally.
    async fn find(&self, user_id: i64) -> Result<Option<CustomerProfile>, UserError> {
        if self.primary.probe().await {
            match self.primary.find(user_id).await {
                Ok(Some(profile)) => return Ok(Some(profile)),
                Ok(None) => debug!(user_id, "Profile not in primary tier"),
                Err(e) => warn!(user_id, error = %e, "Primary profile lookup failed"),
            }
        } else {
            warn!(user_id, "Primary profile tier unavailable");
        }
        self.fallback.find(user_id).await
    }

    /// Written to both tiers; succeeds if either accepted it.
    async fn save(&self, profile: CustomerProfile) -> Result<(), UserError> {
        let user_id = profile.user_id;
        let primary = if self.primary.probe().await {
            self.primary.save(profile.clone()).await
        } else {
            Err(UserError::DatabaseError("primary tier unavailable".to_string()))
        };
        let fallback = self.fallback.save(profile).await;

        match (primary, fallback) {
            (Ok(()), _) | (_, Ok(())) => Ok(()),
            (Err(primary), Err(fallback)) => {
                warn!(user_id, %primary, %fallback, "Profile not saved in any tier");
                Err(fallback)
            }
        }
    }
}

#[async_trait]
impl DeliveryDirectory for Tiered<dyn DeliveryDirectory> {
    async fn active_sessions(&self, now: NaiveDateTime) -> Result<Vec<DeliverySession>, DeliveryError> {
        if self.primary.probe().await {
            match self.primary.active_sessions(now).await {
                Ok(sessions) => return Ok(sessions),
                Err(e) => warn!(error = %e, "Primary delivery listing failed"),
            }
        } else {
            warn!("Primary delivery tier unavailable");
        }
        self.fallback.active_sessions(now).await
    }

    async fn find(&self, id: &str) -> Result<Option<DeliverySession>, DeliveryError> {
        if self.primary.probe().await {
            match self.primary.find(id).await {
                Ok(session) => return Ok(session),
                Err(e) => warn!(delivery_id = id, error = %e, "Primary delivery lookup failed"),
            }
        }
        self.fallback.find(id).await
    }
}

#[async_trait]
impl PickupDirectory for Tiered<dyn PickupDirectory> {
    async fn active_stores(&self) -> Result<Vec<PickupStore>, PickupError> {
        if self.primary.probe().await {
            match self.primary.active_stores().await {
                Ok(stores) => return Ok(stores),
                Err(e) => warn!(error = %e, "Primary store listing failed"),
            }
        }
        self.fallback.active_stores().await
    }

    async fn find(&self, id: &str) -> Result<Option<PickupStore>, PickupError> {
        if self.primary.probe().await {
            match self.primary.find(id).await {
                Ok(store) => return Ok(store),
                Err(e) => warn!(store_id = id, error = %e, "Primary store lookup failed"),
            }
        }
        self.fallback.find(id).await
    }
}
