//! # Repository Seams
//!
//! Traits the conversation talks to instead of concrete stores. Each has a
//! local implementation on top of a resource actor (see [`crate::clients`]);
//! a remote datastore adapter implements the same trait and is put in front of
//! the local one with [`Tiered`].

pub mod tiered;

pub use tiered::Tiered;

use crate::delivery_actor::DeliveryError;
use crate::model::{
    CustomerProfile, DeliverySession, NotificationOutcome, OrderRecord, PickupStore,
};
use crate::order_actor::{OrderError, OrderUpdate};
use crate::pickup_actor::PickupError;
use crate::user_actor::UserError;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Customer profiles keyed by chat user id.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Whether this tier can currently serve requests.
    async fn probe(&self) -> bool {
        true
    }

    async fn find(&self, user_id: i64) -> Result<Option<CustomerProfile>, UserError>;

    async fn save(&self, profile: CustomerProfile) -> Result<(), UserError>;
}

/// Scheduled delivery runs.
#[async_trait]
pub trait DeliveryDirectory: Send + Sync {
    async fn probe(&self) -> bool {
        true
    }

    /// Open sessions whose cutoff is after `now`, earliest delivery first.
    async fn active_sessions(&self, now: NaiveDateTime) -> Result<Vec<DeliverySession>, DeliveryError>;

    async fn find(&self, id: &str) -> Result<Option<DeliverySession>, DeliveryError>;
}

/// Stores offering collection slots.
#[async_trait]
pub trait PickupDirectory: Send + Sync {
    async fn probe(&self) -> bool {
        true
    }

    /// Active stores ordered by name.
    async fn active_stores(&self) -> Result<Vec<PickupStore>, PickupError>;

    async fn find(&self, id: &str) -> Result<Option<PickupStore>, PickupError>;
}

/// Committed orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// `Ok(false)` when the store declined the record without failing.
    async fn create_order(&self, record: &OrderRecord) -> Result<bool, OrderError>;

    async fn get_order(&self, order_id: &str) -> Result<Option<OrderRecord>, OrderError>;

    async fn update_order(&self, order_id: &str, update: OrderUpdate) -> Result<OrderRecord, OrderError>;

    async fn verify_payment(&self, order_id: &str) -> Result<OrderRecord, OrderError>;

    async fn cancel_order(&self, order_id: &str) -> Result<OrderRecord, OrderError>;

    async fn record_notification(
        &self,
        order_id: &str,
        outcome: NotificationOutcome,
    ) -> Result<(), OrderError>;
}
