//! # Delivery Actor
//!
//! Local store of [`DeliverySession`]s, seeded from `deliveries.json` and
//! updated by admins (closing a run, moving its cutoff).

pub mod entity;
pub mod error;

pub use entity::DeliveryUpdate;
pub use error::*;

use crate::clients::DeliveryClient;
use crate::model::DeliverySession;
use actor_framework::ResourceActor;

/// Creates a new Delivery actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<DeliverySession>, DeliveryClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, DeliveryClient::new(generic_client))
}
