//! # Pickup Actor
//!
//! Local store of [`PickupStore`]s and their collection slots.

pub mod entity;
pub mod error;

pub use entity::PickupStoreUpdate;
pub use error::*;

use crate::clients::PickupClient;
use crate::model::PickupStore;
use actor_framework::ResourceActor;

/// Creates a new Pickup actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<PickupStore>, PickupClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, PickupClient::new(generic_client))
}
