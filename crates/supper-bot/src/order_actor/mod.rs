//! # Order Actor
//!
//! Local order store. Conversations commit [`OrderRecord`]s here when no remote
//! store is configured; the dashboard side verifies payments, moves order
//! status and records customer notifications through it.

pub mod entity;
pub mod error;

pub use entity::{OrderAction, OrderUpdate};
pub use error::*;

use crate::clients::OrderClient;
use crate::model::OrderRecord;
use actor_framework::ResourceActor;

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<OrderRecord>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderClient::new(generic_client))
}
