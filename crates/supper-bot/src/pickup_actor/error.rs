//! Error types for the Pickup actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PickupError {
    #[error("Pickup store not found: {0}")]
    NotFound(String),

    #[error("Pickup store validation error: {0}")]
    ValidationError(String),

    #[error("Pickup database error: {0}")]
    DatabaseError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for PickupError {
    fn from(msg: String) -> Self {
        PickupError::ActorCommunicationError(msg)
    }
}
