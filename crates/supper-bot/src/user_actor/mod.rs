//! # User Actor
//!
//! Local store of [`CustomerProfile`]s keyed by chat user id. It is the fallback
//! tier behind a remote profile directory, and the only tier when none is
//! configured.
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation
//! - [`error`] - [`UserError`]
//! - [`new()`] - creates the actor and its [`UserClient`]

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::UserClient;
use crate::model::CustomerProfile;
use actor_framework::ResourceActor;

/// Creates a new User actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<CustomerProfile>, UserClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, UserClient::new(generic_client))
}
