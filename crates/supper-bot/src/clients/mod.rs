//! # Clients
//!
//! Domain-facing wrappers around each actor's [`ResourceClient`](actor_framework::ResourceClient).
//! Every client gets `get`/`list`/`delete` from [`ActorClient`](actor_framework::ActorClient)
//! and implements the matching repository trait, so it can serve as the local
//! tier behind a remote store.

pub mod delivery_client;
pub mod order_client;
pub mod pickup_client;
pub mod user_client;

pub use delivery_client::DeliveryClient;
pub use order_client::OrderClient;
pub use pickup_client::PickupClient;
pub use user_client::UserClient;

use actor_framework::FrameworkError;

/// Recovers the entity's own error when the actor reported one.
pub(crate) fn entity_error<E>(e: FrameworkError) -> Result<E, FrameworkError>
where
    E: std::error::Error + Send + Sync + 'static,
{
    match e {
        FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
            Ok(own) => Ok(*own),
            Err(other) => Err(FrameworkError::EntityError(other)),
        },
        other => Err(other),
    }
}
